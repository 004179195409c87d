//! Parser for textual readout layouts.
//!
//! A layout is a comma-separated list of `name:width` or `name:offset:width`
//! tokens, e.g. `system:5,cryo:1,type:3,layer:8,x:32:-16`. A negative width
//! marks a signed field. Tokens without an offset start right after the
//! previous field.

use std::collections::HashSet;

use crate::{errors::LayoutError, field::FieldSpec};

/// Parses a layout description into field specs, in declaration order.
pub fn parse_layout(description: &str) -> Result<Vec<FieldSpec>, LayoutError> {
    if description.trim().is_empty() {
        return Err(LayoutError::malformed(description, "empty layout"));
    }

    let mut fields = Vec::new();
    let mut seen = HashSet::new();
    let mut next_offset: u32 = 0;

    for token in description.split(',') {
        let token = token.trim();
        let parts: Vec<&str> = token.split(':').map(str::trim).collect();

        let (name, offset, (width, signed)) = match parts.as_slice() {
            [name, width] => (*name, next_offset, parse_width(token, width)?),
            [name, offset, width] => (*name, parse_offset(token, offset)?, parse_width(token, width)?),
            _ => {
                return Err(LayoutError::malformed(
                    token,
                    "expected name:width or name:offset:width",
                ));
            }
        };

        let field = FieldSpec {
            name: name.to_string(),
            offset,
            width,
            signed,
        };
        field.validate().map_err(|err| retarget(err, token))?;

        if !seen.insert(field.name.clone()) {
            return Err(LayoutError::malformed(token, "duplicate field name"));
        }

        next_offset = offset + width;
        fields.push(field);
    }

    Ok(fields)
}

/// Renders fields back into the canonical `name:offset:width` form.
pub fn format_layout(fields: &[FieldSpec]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_offset(token: &str, text: &str) -> Result<u32, LayoutError> {
    text.parse::<u32>()
        .map_err(|_| LayoutError::malformed(token, format!("invalid offset '{text}'")))
}

fn parse_width(token: &str, text: &str) -> Result<(u32, bool), LayoutError> {
    let width = text
        .parse::<i32>()
        .map_err(|_| LayoutError::malformed(token, format!("invalid width '{text}'")))?;

    Ok((width.unsigned_abs(), width < 0))
}

// Report the token as written rather than its canonical form.
fn retarget(err: LayoutError, token: &str) -> LayoutError {
    match err {
        LayoutError::MalformedLayout { reason, .. } => LayoutError::malformed(token, reason),
    }
}
