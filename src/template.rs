//! Copy template substitution
//!
//! Templates know two placeholders, `${link}` and `${title}`. Substitution is a
//! single left-to-right scan over the template, so text coming from a page is
//! inserted verbatim and never expanded again.

const LINK_TOKEN: &str = "${link}";
const TITLE_TOKEN: &str = "${title}";

/// Values available to a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVars<'a> {
    pub link: &'a str,
    pub title: &'a str,
}

/// Render `template` with the given link and title
pub fn format_template(template: &str, vars: &TemplateVars<'_>) -> String {
    let mut out = String::with_capacity(template.len() + vars.link.len() + vars.title.len());
    let mut rest = template;

    while let Some(pos) = rest.find("${") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix(LINK_TOKEN) {
            out.push_str(vars.link);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(TITLE_TOKEN) {
            out.push_str(vars.title);
            rest = after;
        } else {
            // Not one of ours, keep the `$` and continue after it
            out.push('$');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_TEMPLATE;

    fn vars<'a>(link: &'a str, title: &'a str) -> TemplateVars<'a> {
        TemplateVars { link, title }
    }

    #[test]
    fn test_default_template() {
        let out = format_template(DEFAULT_TEMPLATE, &vars("https://x", "T"));
        assert_eq!(out, "- https://x\n- T");
    }

    #[test]
    fn test_every_occurrence_replaced() {
        let out = format_template("${title} | ${title} <${link}>", &vars("u", "t"));
        assert_eq!(out, "t | t <u>");
    }

    #[test]
    fn test_without_placeholders() {
        let out = format_template("nothing to see", &vars("u", "t"));
        assert_eq!(out, "nothing to see");
    }

    #[test]
    fn test_values_are_not_re_expanded() {
        let out = format_template("${link}", &vars("https://x/${title}", "T"));
        assert_eq!(out, "https://x/${title}");

        let out = format_template("${title} ${link}", &vars("L", "a ${link} b"));
        assert_eq!(out, "a ${link} b L");
    }

    #[test]
    fn test_unknown_and_broken_tokens_kept() {
        let out = format_template("${url} ${link ${", &vars("u", "t"));
        assert_eq!(out, "${url} ${link ${");

        let out = format_template("$${link}$", &vars("u", "t"));
        assert_eq!(out, "$u$");
    }
}
