use pulldown_cmark::{html, Options, Parser};

const HEAD: &str = "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Notes</title>\n</head>\n<body>\n";
const TAIL: &str = "</body>\n</html>\n";

/// Render Markdown notes as a standalone HTML page.
pub(super) fn render(notes: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(notes, options);
    let mut out = String::with_capacity(HEAD.len() + notes.len() * 3 / 2 + TAIL.len());
    out.push_str(HEAD);
    html::push_html(&mut out, parser);
    out.push_str(TAIL);
    out
}
