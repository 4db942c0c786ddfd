use super::*;
use crate::display::StyleManager;

fn captured(buffer: &std::sync::Mutex<Vec<u8>>) -> String {
    String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
}

#[test]
fn test_status_lines_are_plain_when_buffered() {
    let (display, buffer) = Display::buffered();
    let status = display.status();

    status.success("pack.zip", "2 mods");
    status.error("plain.mod", "");
    status.warning("skipping images");
    status.info("using cache");
    status.message("Plain message");

    assert_eq!(
        captured(&buffer),
        "✓ pack.zip: 2 mods\n✗ plain.mod\n! skipping images\n· using cache\nPlain message\n"
    );
}

#[test]
fn test_list_and_properties() {
    let (display, buffer) = Display::buffered();
    let status = display.status();

    status.list(&["a.mod", "b.mod"]);
    status.properties(&[("Version", "1.0"), ("Target", "x86_64")]);

    assert_eq!(
        captured(&buffer),
        "  • a.mod\n  • b.mod\nVersion  1.0\nTarget   x86_64\n"
    );
}

#[test]
fn test_forced_color_adds_ansi() {
    let styling = StyleManager::new(crate::primitives::ColorMode::Always);
    assert!(styling.ansi());
    assert!(styling.format_success("done").contains("\u{1b}["));
    assert_eq!(StyleManager::plain().format_success("done"), "✓ done");
}
