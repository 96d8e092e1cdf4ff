//! `statusCode`: checks the response status against exact codes or classes.

use davtester_core::attributes::KeyedAttributes;

use crate::error::{VerifyError, VerifyOutcome};
use crate::verifier::{ResponseView, Verifier, VerifyContext, VerifyResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct StatusCode;

/// One accepted status: `207` or a class such as `2xx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusPattern {
    Exact(u16),
    Class(u16),
}

impl StatusPattern {
    fn parse(text: &str) -> VerifyOutcome<Self> {
        let text = text.trim();
        let invalid = || VerifyError::InvalidArgument {
            name: "status",
            value: text.to_string(),
        };

        if let Some(class) = text.strip_suffix("xx").or_else(|| text.strip_suffix("XX")) {
            let class: u16 = class.parse().map_err(|_| invalid())?;
            if !(1..=5).contains(&class) {
                return Err(invalid());
            }
            return Ok(Self::Class(class));
        }

        text.parse().map(Self::Exact).map_err(|_| invalid())
    }

    const fn matches(self, status: u16) -> bool {
        match self {
            Self::Exact(code) => code == status,
            Self::Class(class) => status / 100 == class,
        }
    }
}

impl Verifier for StatusCode {
    fn verify(
        &self,
        _ctx: &VerifyContext<'_>,
        response: &ResponseView<'_>,
        args: &KeyedAttributes,
    ) -> VerifyOutcome<VerifyResult> {
        let patterns = match args.get_all("status") {
            [] => vec![StatusPattern::Class(2)],
            values => values
                .iter()
                .map(|v| StatusPattern::parse(v))
                .collect::<VerifyOutcome<Vec<_>>>()?,
        };

        if patterns.iter().any(|p| p.matches(response.status)) {
            Ok(VerifyResult::ok())
        } else {
            Ok(VerifyResult::failed(format!(
                "        HTTP Status Code Wrong: {}",
                response.status
            )))
        }
    }
}
