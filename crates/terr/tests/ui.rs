#[test]
fn templated_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/templated_error_unit.rs");
    t.pass("tests/ui/templated_error_fields.rs");
    t.pass("tests/ui/templated_error_field_conversions.rs");
    t.compile_fail("tests/ui/templated_error_unknown_placeholder.rs");
    t.compile_fail("tests/ui/templated_error_malformed_template.rs");
    t.compile_fail("tests/ui/templated_error_tuple_struct.rs");
    t.compile_fail("tests/ui/templated_error_duplicate_template.rs");
}
