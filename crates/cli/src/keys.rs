//! Key scripts for exercising the money editor from the command line.
//!
//! A script is a list of key names: single characters (`5`, `-`, `,`), the
//! step keys (`PageUp`, `PageDown`, `Up`, `Down`), non-printing keys such as
//! `Tab` or `Left`, optionally prefixed with `ctrl+` or `alt+`.

use std::fmt;

use anyhow::{Result, bail};
use paydesk_types::{FieldState, KeyInput, MoneyKey, StepKey};
use paydesk_util::{Transition, transition};

/// Parse one key name.
pub fn parse_key(name: &str) -> Result<KeyInput> {
    let mut input = KeyInput::plain(MoneyKey::Control);
    let mut rest = name;
    loop {
        let lower = rest.to_ascii_lowercase();
        if lower.starts_with("ctrl+") && rest.len() > 5 {
            input.ctrl = true;
            rest = &rest[5..];
        } else if lower.starts_with("alt+") && rest.len() > 4 {
            input.alt = true;
            rest = &rest[4..];
        } else {
            break;
        }
    }

    let mut chars = rest.chars();
    input.key = match (chars.next(), chars.next()) {
        (Some(c), None) => MoneyKey::from_char(c),
        _ => match rest.to_ascii_lowercase().as_str() {
            "pageup" | "pgup" => MoneyKey::Step(StepKey::PageUp),
            "pagedown" | "pgdn" => MoneyKey::Step(StepKey::PageDown),
            "up" | "arrowup" => MoneyKey::Step(StepKey::ArrowUp),
            "down" | "arrowdown" => MoneyKey::Step(StepKey::ArrowDown),
            "left" | "right" | "home" | "end" | "tab" | "enter" | "esc" | "backspace" | "delete" => MoneyKey::Control,
            _ => bail!("unknown key '{name}'"),
        },
    };
    Ok(input)
}

/// What the editor did with one key of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    pub key: String,
    pub outcome: &'static str,
    pub state: FieldState,
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<12} {:<12} {}", self.key, self.outcome, render_state(&self.state))
    }
}

/// Run `keys` through the editor starting from `state`.
///
/// Keys the editor passes through leave the state unchanged, as if the host
/// ignored them too.
pub fn trace(mut state: FieldState, keys: &[String]) -> Result<Vec<TraceStep>> {
    let mut steps = Vec::with_capacity(keys.len());
    for name in keys {
        let input = parse_key(name)?;
        let outcome = match transition(&state, input) {
            Transition::Edited(next) => {
                state = next;
                "edited"
            }
            Transition::Suppressed => "suppressed",
            Transition::PassThrough => "pass-through",
        };
        steps.push(TraceStep {
            key: name.clone(),
            outcome,
            state: state.clone(),
        });
    }
    Ok(steps)
}

/// Show the caret as `|` and a selection in brackets, e.g. `12.3|4`.
pub fn render_state(state: &FieldState) -> String {
    let chars: Vec<char> = state.text.chars().collect();
    let selection = state.selection.clamp(chars.len());
    let mut out = String::with_capacity(chars.len() + 2);
    out.extend(&chars[..selection.start]);
    if selection.is_collapsed() {
        out.push('|');
    } else {
        out.push('[');
        out.extend(&chars[selection.start..selection.end]);
        out.push(']');
    }
    out.extend(&chars[selection.end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn parses_key_names() {
        assert_eq!(parse_key("7").unwrap().key, MoneyKey::Digit(7));
        assert_eq!(parse_key(",").unwrap().key, MoneyKey::DecimalSeparator);
        assert_eq!(parse_key("PageUp").unwrap().key, MoneyKey::Step(StepKey::PageUp));
        assert_eq!(parse_key("down").unwrap().key, MoneyKey::Step(StepKey::ArrowDown));
        assert_eq!(parse_key("Tab").unwrap().key, MoneyKey::Control);

        let ctrl_a = parse_key("ctrl+a").unwrap();
        assert!(ctrl_a.ctrl && !ctrl_a.alt);
        assert_eq!(ctrl_a.key, MoneyKey::Other('a'));

        assert!(parse_key("Hyper").is_err());
        assert!(parse_key("").is_err());
    }

    #[test]
    fn traces_typing_from_empty() {
        let steps = trace(FieldState::default(), &keys(&["5", "0", "0"])).unwrap();
        let rendered: Vec<String> = steps.iter().map(|step| render_state(&step.state)).collect();
        assert_eq!(rendered, vec!["5|", "0.50|", "5.00|"]);
        assert!(steps.iter().all(|step| step.outcome == "edited"));
    }

    #[test]
    fn trace_reports_ignored_keys() {
        let steps = trace(FieldState::with_caret("5.00", 4), &keys(&["x", "ctrl+c", "Up"])).unwrap();
        assert_eq!(steps[0].outcome, "suppressed");
        assert_eq!(steps[1].outcome, "pass-through");
        assert_eq!(steps[2].state.text, "5.10");
    }

    #[test]
    fn renders_caret_and_selection() {
        assert_eq!(render_state(&FieldState::with_caret("12.34", 3)), "12.|34");
        assert_eq!(render_state(&FieldState::with_selection("12.34", 0, 2)), "[12].34");
    }
}
