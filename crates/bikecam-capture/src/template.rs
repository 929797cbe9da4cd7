//! Screenshot filename templates
//!
//! Supported placeholders:
//!
//! | Placeholder | Expands to |
//! |-------------|------------|
//! | `{w}` `{h}` | frame width / height in pixels |
//! | `{d}` `{t}` | `2024-05-17` / `14-03-09` |
//! | `{d1}` `{t1}` | `20240517` / `140309` |
//! | `{d2}` `{t2}` | `17.05.2024` / `14.03.09` |
//! | `{cnt2}`..`{cnt5}` | session counter padded to 2..5 digits |
//!
//! Anything else between braces is kept verbatim.

use chrono::{DateTime, Local};

/// Values available to a template expansion
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext {
    pub width: u32,
    pub height: u32,
    pub now: DateTime<Local>,
    pub counter: u32,
}

fn placeholder(name: &str, ctx: &TemplateContext) -> Option<String> {
    let value = match name {
        "w" => ctx.width.to_string(),
        "h" => ctx.height.to_string(),
        "d" => ctx.now.format("%Y-%m-%d").to_string(),
        "t" => ctx.now.format("%H-%M-%S").to_string(),
        "d1" => ctx.now.format("%Y%m%d").to_string(),
        "t1" => ctx.now.format("%H%M%S").to_string(),
        "d2" => ctx.now.format("%d.%m.%Y").to_string(),
        "t2" => ctx.now.format("%H.%M.%S").to_string(),
        "cnt2" => format!("{:02}", ctx.counter),
        "cnt3" => format!("{:03}", ctx.counter),
        "cnt4" => format!("{:04}", ctx.counter),
        "cnt5" => format!("{:05}", ctx.counter),
        _ => return None,
    };
    Some(value)
}

/// Substitute every known placeholder in `template`.
pub fn expand_template(template: &str, ctx: &TemplateContext) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open..];
        match after.find('}') {
            Some(close) => {
                let name = &after[1..close];
                match placeholder(name, ctx) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&after[..=close]),
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(after);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Separator used when a suffix has to be appended to avoid a name collision.
///
/// The last `_` or space in the template's stem wins; `_` when there is neither.
pub fn detect_separator(template: &str) -> char {
    let stem = match template.rfind('.') {
        Some(dot) => &template[..dot],
        None => template,
    };
    stem.chars()
        .rev()
        .find(|c| *c == '_' || *c == ' ')
        .unwrap_or('_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ctx(counter: u32) -> TemplateContext {
        TemplateContext {
            width: 1920,
            height: 1080,
            now: Local.with_ymd_and_hms(2024, 5, 17, 14, 3, 9).unwrap(),
            counter,
        }
    }

    #[test]
    fn test_expands_all_placeholders() {
        let out = expand_template("{w}x{h} {d} {t} {d1} {t1} {d2} {t2}", &ctx(1));
        assert_eq!(
            out,
            "1920x1080 2024-05-17 14-03-09 20240517 140309 17.05.2024 14.03.09"
        );
    }

    #[test]
    fn test_counter_padding() {
        let out = expand_template("{cnt2}-{cnt3}-{cnt4}-{cnt5}", &ctx(7));
        assert_eq!(out, "07-007-0007-00007");
    }

    #[test]
    fn test_unknown_and_unclosed_placeholders_are_kept() {
        assert_eq!(expand_template("a{x}b", &ctx(1)), "a{x}b");
        assert_eq!(expand_template("shot_{cnt2", &ctx(1)), "shot_{cnt2");
    }

    #[test]
    fn test_detect_separator() {
        assert_eq!(detect_separator("shot_{cnt2}.png"), '_');
        assert_eq!(detect_separator("shot {cnt2}.png"), ' ');
        assert_eq!(detect_separator("my photo_{cnt2}.png"), '_');
        assert_eq!(detect_separator("shot{cnt2}.png"), '_');
        assert_eq!(detect_separator("a_b {cnt2}.jpg"), ' ');
    }
}
