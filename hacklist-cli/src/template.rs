//! Text templates for rendering listings on the terminal.

use std::str::FromStr;

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderError,
};
use hacklist::Date;
use serde::Serialize;
use serde_json::Value as JsonValue;

const EVENT_TEMPLATE: &str = "{{pad id \" \" 3}}  {{name}}
     {{format_date date \"[month repr:short] [day padding:none], [year]\"}} - {{format_date endDate \"[month repr:short] [day padding:none], [year]\"}} | {{location}}";

const EVENT_DETAIL_TEMPLATE: &str = "{{name}} (#{{id}})
{{format_date date \"[weekday], [month repr:long] [day padding:none], [year]\"}} to {{format_date endDate \"[weekday], [month repr:long] [day padding:none], [year]\"}}
{{location}}

{{description}}
{{#if participants}}
Participants:
{{#each participants}}  - {{name}} (@{{username}}){{#if skills}}: {{#each skills}}{{#unless @first}}, {{/unless}}{{this}}{{/each}}{{/if}}
{{/each}}{{/if}}";

const UPCOMING_TEMPLATE: &str = "{{pad id \" \" 3}}  {{name}} | {{format_date date \"[month repr:short] [day padding:none], [year]\"}} | {{#if (eq daysUntil 0)}}today{{else}}{{#if started}}in progress{{else}}in {{daysUntil}} day(s){{/if}}{{/if}}";

const PROFILE_TEMPLATE: &str = "{{pad id \" \" 3}}  {{name}} (@{{username}}) | {{location}}
     {{#each skills}}{{#unless @first}}, {{/unless}}{{this}}{{/each}}";

/// The registry of templates used by the command line interface.
pub struct Templates<'reg> {
    hb: Handlebars<'reg>,
}

impl<'reg> Templates<'reg> {
    /// Constructor. Registers the built-in templates and helpers.
    pub fn new() -> Result<Self, handlebars::TemplateError> {
        let mut hb = Handlebars::new();
        hb.register_escape_fn(handlebars::no_escape);
        hb.register_helper("format_date", Box::new(format_date));
        hb.register_helper("pad", Box::new(pad));
        hb.register_template_string("event", EVENT_TEMPLATE)?;
        hb.register_template_string("event_detail", EVENT_DETAIL_TEMPLATE)?;
        hb.register_template_string("upcoming", UPCOMING_TEMPLATE)?;
        hb.register_template_string("profile", PROFILE_TEMPLATE)?;
        Ok(Self { hb })
    }

    /// Render the named template with the given data.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, RenderError> {
        self.hb.render(name, data)
    }
}

fn param_as_string(h: &Helper, idx: usize) -> Option<String> {
    h.param(idx).map(|p| match p.value() {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    })
}

/// Parses a string as a date and formats it according to a formatting rule.
///
/// Usage:
///
/// ```handlebars
/// {{ format_date "2022-01-01" "[month repr:long] [day], [year]" }}
/// ```
///
/// Produces `January 01, 2022`.
///
/// The formatting rule is defined by the
/// [`time`](https://crates.io/crates/time) crate. Values that are not valid
/// dates are written out unchanged.
pub fn format_date(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let raw = param_as_string(h, 0)
        .ok_or_else(|| RenderError::new("format_date: missing date parameter"))?;
    let description = param_as_string(h, 1)
        .ok_or_else(|| RenderError::new("format_date: missing format parameter"))?;
    let formatted = match Date::from_str(&raw) {
        Ok(date) => date
            .format(&description)
            .map_err(|e| RenderError::new(format!("format_date: {}", e)))?,
        Err(_) => raw,
    };
    out.write(&formatted)?;
    Ok(())
}

/// Pad a string with a given character or string until it meets the specified
/// length.
///
/// Usage:
///
/// ```handlebars
/// {{ pad "2" "0" 2 }}
/// ```
///
/// Produces `02`. Parameters are in the format
/// `{{ pad string paddingCharOrString desiredMinLength }}`
pub fn pad(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let s = param_as_string(h, 0).unwrap_or_default();
    let padding = param_as_string(h, 1).unwrap_or_else(|| " ".to_string());
    let min_len = h
        .param(2)
        .and_then(|p| p.value().as_u64())
        .ok_or_else(|| RenderError::new("pad: expected a numeric minimum length"))?
        as usize;
    let mut result = String::new();
    let len = s.chars().count();
    if !padding.is_empty() {
        while result.chars().count() + len < min_len {
            result.push_str(&padding);
        }
    }
    result.push_str(&s);
    out.write(&result)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn pad_helper() {
        let mut hb = Handlebars::new();
        hb.register_helper("pad", Box::new(pad));
        assert_eq!(hb.render_template("{{pad \"2\" \"0\" 2}}", &json!({})).unwrap(), "02");
        assert_eq!(hb.render_template("{{pad id \" \" 3}}", &json!({"id": 7})).unwrap(), "  7");
        assert_eq!(hb.render_template("{{pad \"1234\" \"0\" 2}}", &json!({})).unwrap(), "1234");
    }

    #[test]
    fn format_date_helper() {
        let mut hb = Handlebars::new();
        hb.register_helper("format_date", Box::new(format_date));
        assert_eq!(
            hb.render_template(
                "{{format_date d \"[month repr:long] [day padding:none], [year]\"}}",
                &json!({"d": "2022-01-01"})
            )
            .unwrap(),
            "January 1, 2022"
        );
        assert_eq!(
            hb.render_template("{{format_date d \"[year]\"}}", &json!({"d": "soon"}))
                .unwrap(),
            "soon"
        );
    }

    #[test]
    fn event_template() {
        let templates = Templates::new().unwrap();
        let rendered = templates
            .render(
                "event",
                &json!({
                    "id": 1,
                    "name": "TechCrunch Delhi",
                    "date": "2023-10-15",
                    "endDate": "2023-10-17",
                    "location": "Delhi, India",
                }),
            )
            .unwrap();
        assert_eq!(
            rendered,
            "  1  TechCrunch Delhi\n     Oct 15, 2023 - Oct 17, 2023 | Delhi, India"
        );
    }

    #[test]
    fn profile_template() {
        let templates = Templates::new().unwrap();
        let rendered = templates
            .render(
                "profile",
                &json!({
                    "id": 3,
                    "name": "Vikram Singh",
                    "username": "vikramcode",
                    "location": "Delhi, India",
                    "skills": ["React", "Vue.js"],
                }),
            )
            .unwrap();
        assert_eq!(
            rendered,
            "  3  Vikram Singh (@vikramcode) | Delhi, India\n     React, Vue.js"
        );
    }
}
