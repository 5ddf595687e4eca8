//! `{{variable}}` interpolation

use crate::types::context::NarrativeContext;
use std::collections::HashMap;

/// Anything that can resolve a variable name to display text
pub trait VariableSource {
    fn lookup(&self, name: &str) -> Option<String>;
}

impl VariableSource for NarrativeContext {
    fn lookup(&self, name: &str) -> Option<String> {
        self.var(name)
    }
}

impl VariableSource for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Replace every `{{name}}` in `text` with its value from `vars`.
///
/// The name is trimmed before lookup. Unknown names, and unterminated
/// placeholders, are left as literal text.
pub fn interpolate(text: &str, vars: &dyn VariableSource) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];

        match after_open.find('}') {
            // placeholder bodies may not contain '}' and must be non-empty
            Some(close) if close > 0 && after_open[close..].starts_with("}}") => {
                let raw = &after_open[..close];
                let placeholder = &rest[open..open + 2 + close + 2];
                match vars.lookup(raw.trim()) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(placeholder),
                }
                rest = &after_open[close + 2..];
            }
            _ => {
                out.push_str("{{");
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn replaces_known_variables() {
        let vars = vars(&[("name", "OIIA"), ("count", "3")]);
        assert_eq!(
            interpolate("{{name}} spins {{ count }} times", &vars),
            "OIIA spins 3 times"
        );
    }

    #[test]
    fn unknown_variables_stay_literal() {
        let vars = vars(&[]);
        assert_eq!(interpolate("hello {{ who }}!", &vars), "hello {{ who }}!");
    }

    #[test]
    fn unterminated_and_empty_placeholders_stay_literal() {
        let vars = vars(&[("a", "x")]);
        assert_eq!(interpolate("{{a", &vars), "{{a");
        assert_eq!(interpolate("{{}} {{a}}", &vars), "{{}} x");
        assert_eq!(interpolate("{{a}x}}", &vars), "{{a}x}}");
    }

    #[test]
    fn resolves_against_narrative_context() {
        let mut ctx = NarrativeContext::default();
        ctx.driving_distance = 42;
        assert_eq!(
            interpolate("還有 {{drivingDistance}} 公分", &ctx),
            "還有 42 公分"
        );
    }

    #[test]
    fn handles_multibyte_text_around_placeholders() {
        let vars = vars(&[("貓", "喵")]);
        assert_eq!(interpolate("「{{貓}}」「{{狗}}」", &vars), "「喵」「{{狗}}」");
    }
}
