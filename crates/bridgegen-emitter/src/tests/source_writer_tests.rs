use super::*;

#[test]
fn test_indentation_applies_to_first_write_of_a_line() {
    let mut writer = SourceWriter::new(2);
    writer.line("class A");
    writer.open_block();
    writer.write("int ");
    writer.write("x;");
    writer.write_line();
    writer.close_block();
    assert_eq!(writer.finish(), "class A\n{\n  int x;\n}\n");
}

#[test]
fn test_tab_indentation() {
    let mut writer = SourceWriter::new(0);
    writer.increase_indent();
    writer.increase_indent();
    writer.line("x");
    assert_eq!(writer.get_output(), "\t\tx\n");
}

#[test]
fn test_blank_line_has_no_indentation() {
    let mut writer = SourceWriter::new(4);
    writer.increase_indent();
    writer.write("a");
    writer.blank_line();
    writer.line("b");
    assert_eq!(writer.finish(), "    a\n\n    b\n");
}

#[test]
fn test_decrease_indent_saturates() {
    let mut writer = SourceWriter::new(4);
    writer.decrease_indent();
    assert_eq!(writer.indent_level(), 0);
    writer.line("x");
    assert_eq!(writer.finish(), "x\n");
}

#[test]
fn test_write_joined() {
    let mut writer = SourceWriter::new(4);
    writer.write_joined(", ", ["T", "U", "V"]);
    writer.write_joined(", ", Vec::<String>::new());
    assert_eq!(writer.finish(), "T, U, V");
}
