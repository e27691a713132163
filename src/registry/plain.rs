/// Registry lines with surrounding whitespace and blank lines removed
pub fn parse(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn render(paths: &[&str]) -> String {
    let mut out = paths.join("\n");
    out.push('\n');
    out
}
