use super::*;

fn texts(lines: &[Line]) -> Vec<&str> {
    lines.iter().map(|l| l.text.as_str()).collect()
}

#[test]
fn wrap_breaks_on_word_boundaries() {
    assert_eq!(wrap("one two three four", 9), vec!["one two", "three", "four"]);
}

#[test]
fn wrap_hard_splits_long_words() {
    assert_eq!(wrap("abcdefghij xy", 4), vec!["abcd", "efgh", "ij", "xy"]);
}

#[test]
fn wrap_keeps_tail_of_split_word_open_for_next_word() {
    assert_eq!(wrap("abcdef g", 4), vec!["abcd", "ef g"]);
}

#[test]
fn wrap_honors_explicit_newlines() {
    assert_eq!(wrap("first\n\nsecond", 20), vec!["first", "", "second"]);
}

#[test]
fn wrap_empty_text_yields_single_empty_row() {
    assert_eq!(wrap("", 10), vec![String::new()]);
}

#[test]
fn wrap_counts_chars_not_bytes() {
    let rows = wrap("ñandú café añejo", 10);
    assert_eq!(rows, vec!["ñandú café", "añejo"]);
}

#[test]
fn centered_pads_left_only() {
    let mut layout = Layout::new(10);
    layout.centered("abcd", Emphasis::Strong);
    let lines = layout.into_lines();
    assert_eq!(lines[0].text, "   abcd");
    assert_eq!(lines[0].emphasis, Emphasis::Strong);
}

#[test]
fn pair_right_aligns_amount() {
    let mut layout = Layout::new(20);
    layout.pair("TOTAL", "$10.00", Emphasis::Normal);
    let lines = layout.into_lines();
    assert_eq!(lines[0].text, "TOTAL         $10.00");
    assert_eq!(lines[0].width(), 20);
}

#[test]
fn pair_truncates_left_side_to_keep_amount() {
    let mut layout = Layout::new(16);
    layout.pair("A very long item name", "$5.00", Emphasis::Normal);
    let lines = layout.into_lines();
    assert_eq!(lines[0].text, "A very lon $5.00");
    assert!(lines[0].text.ends_with("$5.00"));
    assert!(lines[0].width() <= 16);
}

#[test]
fn pair_with_oversized_right_moves_left_above() {
    let mut layout = Layout::new(8);
    layout.pair("Total", "$1,000.00", Emphasis::Normal);
    let lines = layout.into_lines();
    assert_eq!(texts(&lines), vec!["Total", "$1,000.0"]);
}

#[test]
fn item_wraps_name_under_itself() {
    let mut layout = Layout::new(24);
    layout.item(2, "Milanesa napolitana con papas fritas", Some("$30.00"), Emphasis::Normal);
    let lines = layout.into_lines();
    assert_eq!(lines[0].text, "  2 Milanesa      $30.00");
    assert!(lines[1].text.starts_with("    napolitana"));
    assert!(lines.iter().all(|l| l.width() <= 24));
}

#[test]
fn item_without_amount_uses_full_width() {
    let mut layout = Layout::new(20);
    layout.item(12, "Empanadas de carne", None, Emphasis::Strong);
    let lines = layout.into_lines();
    assert_eq!(lines[0].text, " 12 Empanadas de");
    assert_eq!(lines[1].text, "    carne");
}

#[test]
fn indented_rows_respect_width() {
    let mut layout = Layout::new(12);
    layout.indented(4, "> no onions please");
    let lines = layout.into_lines();
    assert!(lines.iter().all(|l| l.text.starts_with("    ")));
    assert!(lines.iter().all(|l| l.width() <= 12));
}

#[test]
fn rule_fills_the_row() {
    let mut layout = Layout::new(5);
    layout.rule();
    layout.blank();
    assert_eq!(texts(&layout.into_lines()), vec!["-----", ""]);
}
