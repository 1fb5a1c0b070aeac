use hotbind_meta::{Described, describe};
use rstest::rstest;

use super::*;
use crate::symbols::SymbolRegistry;

struct Sample;
struct Other;
struct Ping;

fn none() {}
fn code(_: i32) {}
fn payload(_: &Ping) {}
fn code_payload(_: u32, _: &Ping) {}
fn recv(_: &mut Sample) {}
fn recv_code(_: &mut Sample, _: i32) {}
fn recv_payload(_: &mut Sample, _: &Ping) {}
fn recv_code_payload(_: &mut Sample, _: i32, _: &Ping) {}
fn ext(_: &mut Other) {}
fn ext_code(_: &mut Other, _: u32) {}
fn ext_payload(_: &mut Other, _: &Ping) {}
fn returns() -> bool {
	true
}
fn payload_first(_: &Ping, _: i32) {}
fn flag_only(_: bool) {}
fn on_loaded(_: &Symbol) {}
fn on_loaded_flag(_: &Symbol, _: bool) {}

describe!(Sample {
	methods: {
		none() = none;
		code(i32) = code;
		payload(&Ping) = payload;
		code_payload(u32, &Ping) = code_payload;
		recv(&mut Sample) = recv;
		recv_code(&mut Sample, i32) = recv_code;
		recv_payload(&mut Sample, &Ping) = recv_payload;
		recv_code_payload(&mut Sample, i32, &Ping) = recv_code_payload;
		ext(&mut Other) = ext;
		ext_code(&mut Other, u32) = ext_code;
		ext_payload(&mut Other, &Ping) = ext_payload;
		returns() -> bool = returns;
		payload_first(&Ping, i32) = payload_first;
		flag_only(bool) = flag_only;
		on_loaded(&Symbol) = on_loaded;
		on_loaded_flag(&Symbol, bool) = on_loaded_flag;
	},
});

fn method(name: &str) -> SymMethod {
	let mut registry = SymbolRegistry::new();
	let symbol = registry.build(Sample::type_def());
	symbol.method(name).cloned().unwrap()
}

#[rstest]
#[case("none", true)]
#[case("code", true)]
#[case("payload", true)]
#[case("code_payload", true)]
#[case("recv", true)]
#[case("recv_code", true)]
#[case("recv_payload", true)]
#[case("recv_code_payload", true)]
#[case("returns", false)]
#[case("payload_first", false)]
#[case("flag_only", false)]
fn event_signatures(#[case] name: &str, #[case] valid: bool) {
	assert_eq!(EventRules::is_valid_signature(&method(name)), valid);
}

#[rstest]
#[case("none", true)]
#[case("code", true)]
#[case("recv", true)]
#[case("recv_code", true)]
#[case("payload", false)]
#[case("recv_payload", false)]
fn input_signatures(#[case] name: &str, #[case] valid: bool) {
	assert_eq!(InputRules::is_valid_signature(&method(name)), valid);
}

#[rstest]
#[case("none", true)]
#[case("payload", true)]
#[case("recv", false)]
#[case("code", false)]
fn notice_signatures(#[case] name: &str, #[case] valid: bool) {
	assert_eq!(NoticeRules::is_valid_signature(&method(name)), valid);
}

#[rstest]
#[case("recv_payload", true)]
#[case("ext_payload", true)]
#[case("recv", false)]
#[case("payload", false)]
fn inject_signatures(#[case] name: &str, #[case] valid: bool) {
	assert_eq!(InjectRules::is_valid_signature(&method(name)), valid);
}

#[rstest]
#[case("payload", true)]
#[case("code_payload", true)]
#[case("recv_payload", true)]
#[case("none", false)]
#[case("code", false)]
fn message_signatures(#[case] name: &str, #[case] valid: bool) {
	assert_eq!(MessageRules::is_valid_signature(&method(name)), valid);
}

#[rstest]
#[case("ext", true)]
#[case("ext_code", true)]
#[case("ext_payload", true)]
#[case("recv", false)]
#[case("recv_code", false)]
#[case("none", false)]
fn extend_signatures_require_foreign_receiver(#[case] name: &str, #[case] valid: bool) {
	assert_eq!(ExtendRules::is_valid_signature(&method(name)), valid);
}

#[rstest]
#[case("recv", true)]
#[case("none", true)]
#[case("code", false)]
#[case("recv_code", false)]
fn aspect_signatures(#[case] name: &str, #[case] valid: bool) {
	assert_eq!(AspectRules::is_valid_signature(&method(name)), valid);
}

#[rstest]
#[case("on_loaded", true)]
#[case("on_loaded_flag", true)]
#[case("payload", false)]
#[case("none", false)]
fn loaded_callback_signatures(#[case] name: &str, #[case] valid: bool) {
	assert_eq!(LoadedCallbackRules::is_valid_signature(&method(name)), valid);
}

#[test]
fn unloaded_callbacks_take_nothing() {
	assert!(UnloadedCallbackRules::is_valid_signature(&method("none")));
	assert!(!UnloadedCallbackRules::is_valid_signature(&method("recv")));
}

#[test]
fn null_parameter_variants() {
	assert!(AspectRules::is_null_parameter_variant(&method("none")));
	assert!(!AspectRules::is_null_parameter_variant(&method("recv")));
	assert!(!ExtendRules::is_null_parameter_variant(&method("none")));
	assert!(!MessageRules::is_null_parameter_variant(&method("none")));
}

#[test]
fn payload_type_must_match_when_declared() {
	assert!(payload_matches(&method("payload"), TypeKey::of::<Ping>()));
	assert!(!payload_matches(&method("payload"), TypeKey::of::<Other>()));
	assert!(payload_matches(&method("none"), TypeKey::of::<Other>()));
}
