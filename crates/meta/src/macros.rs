//! Registration macros.

/// Describes a type and registers it with the link-time catalog.
///
/// Every section is optional but sections must appear in this order:
///
/// ```ignore
/// describe!(Player {
///     bean: "player",
///     priority: 10,
///     base: Actor,
///     markers: [ClassMarker::EventSystem],
///     features: [POOLED],
///     roles: [dyn Entity],
///     construct: Player::default,
///     methods: {
///         on_hit(&mut Player, &Hit) = Player::on_hit => [MethodMarker::event_of::<Hit>()];
///         on_reset() = reset_all => [MethodMarker::event(7)];
///     },
/// });
/// ```
///
/// Parameter kinds come from [`MethodParam`](crate::MethodParam): `&mut T`
/// is a receiver, `&T` a payload, integers are codes and `bool` is a flag.
#[macro_export]
macro_rules! describe {
	(
		$ty:ty {
			$(bean: $bean:expr,)?
			$(priority: $priority:expr,)?
			$(base: $base:ty,)?
			$(markers: [$($marker:expr),* $(,)?],)?
			$(features: [$($feature:expr),* $(,)?],)?
			$(roles: [$($role:ty),* $(,)?],)?
			$(construct: $construct:expr,)?
			$(methods: {
				$(
					$mname:ident ( $($pty:ty),* $(,)? ) $(-> $ret:ty)? = $func:expr
						$(=> [$($mmarker:expr),* $(,)?])?
				);* $(;)?
			} $(,)?)?
		}
	) => {
		impl $crate::Described for $ty {
			fn type_def() -> &'static $crate::TypeDef {
				static DEF: $crate::TypeDef = $crate::TypeDef {
					key: $crate::TypeKey::of::<$ty> as $crate::TypeKeyFn,
					name: stringify!($ty),
					module: module_path!(),
					base: $crate::__describe_opt!($($crate::TypeKey::of::<$base> as $crate::TypeKeyFn)?),
					markers: &[$($($marker),*)?],
					features: &[$($($feature),*)?],
					roles: &[$($($crate::TypeKey::of::<$role> as $crate::TypeKeyFn),*)?],
					bean: $crate::__describe_opt!($($crate::BeanDecl::new($bean))?),
					priority: $crate::__describe_or!($($priority)?; 0),
					construct: $crate::__describe_opt!($({
						fn construct() -> ::std::boxed::Box<dyn ::std::any::Any> {
							::std::boxed::Box::new(($construct)())
						}
						construct as $crate::ConstructFn
					})?),
					methods: &[$($(
						$crate::MethodDef {
							name: stringify!($mname),
							markers: &[$($($mmarker),*)?],
							shape: {
								fn shape() -> $crate::MethodShape {
									$crate::MethodShape::new(
										::std::vec![$(<$pty as $crate::MethodParam<'_>>::kind()),*],
										$crate::ReturnKind::of::<$crate::__describe_ret!($($ret)?)>(),
									)
								}
								shape
							},
							thunk: {
								fn thunk(
									_inv: &mut $crate::Invocation<'_>,
								) -> ::std::result::Result<(), $crate::InvokeError> {
									let _ = ($func)($(<$pty as $crate::MethodParam<'_>>::extract(_inv)?),*);
									::std::result::Result::Ok(())
								}
								thunk
							},
						}
					),*)?],
				};
				&DEF
			}
		}

		$crate::__private::inventory::submit! {
			$crate::TypeReg(<$ty as $crate::Described>::type_def)
		}
	};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __describe_opt {
	() => {
		::std::option::Option::None
	};
	($val:expr) => {
		::std::option::Option::Some($val)
	};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __describe_or {
	(; $default:expr) => {
		$default
	};
	($val:expr; $default:expr) => {
		$val
	};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __describe_ret {
	() => {
		()
	};
	($ret:ty) => {
		$ret
	};
}
