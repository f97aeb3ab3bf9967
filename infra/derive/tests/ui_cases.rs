#[test]
fn regform_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/regform_error_pass.rs");
}
