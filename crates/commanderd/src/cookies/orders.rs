//! Cookie orders, their responses, and the handlers that fill them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use commander::{BoxError, Command, CommandHandler, CommandResponse, ValidationErrors};

use super::store::{Cookie, CookieStore};

/// Largest sugar budget a single order may request, in grams.
pub const MAX_SUGAR_LIMIT_GRAMS: i64 = 10_000;

/// Raised when the store cannot fill an order at all.
#[derive(Debug, Error)]
#[error("the cookie store is empty")]
pub struct EmptyStore;

/// Order for the single sweetest cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SugarComaCookieOrder {}

impl Command for SugarComaCookieOrder {
    type Response = SugarComaCookieOrderResponse;

    fn command_type(&self) -> &str {
        "SugarComaCookieOrder"
    }
}

/// Reply to [`SugarComaCookieOrder`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SugarComaCookieOrderResponse {
    /// The sweetest cookie in the store.
    pub sugar_coma_cookie: Cookie,
}

impl CommandResponse for SugarComaCookieOrderResponse {}

/// Order for the first cookie made with ginger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FirstAvailableGingerCookieOrder {}

impl Command for FirstAvailableGingerCookieOrder {
    type Response = GingerCookieOrderResponse;

    fn command_type(&self) -> &str {
        "FirstAvailableGingerCookieOrder"
    }
}

/// Reply to [`FirstAvailableGingerCookieOrder`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GingerCookieOrderResponse {
    /// First ginger cookie, or `null` when the store has none.
    pub ginger_cookie: Option<Cookie>,
}

impl CommandResponse for GingerCookieOrderResponse {}

/// Order for as many cookies as fit within a sugar budget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxSugarOrder {
    /// Sugar budget in grams.
    pub max_sugar_in_grams: i64,
}

impl Command for MaxSugarOrder {
    type Response = MaxSugarOrderResponse;

    fn command_type(&self) -> &str {
        "MaxSugarOrder"
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.max_sugar_in_grams < 0 {
            errors.push("maxSugarInGrams", "must not be negative");
        } else if self.max_sugar_in_grams > MAX_SUGAR_LIMIT_GRAMS {
            errors.push(
                "maxSugarInGrams",
                format!("must not exceed {MAX_SUGAR_LIMIT_GRAMS}"),
            );
        }
        errors.into_result()
    }
}

/// Reply to [`MaxSugarOrder`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxSugarOrderResponse {
    /// Cookies chosen, in the order they were taken.
    pub cookies: Vec<Cookie>,
    /// Combined sugar of `cookies`, in grams.
    pub sugar_total: u64,
}

impl CommandResponse for MaxSugarOrderResponse {}

/// Fills [`SugarComaCookieOrder`].
#[derive(Debug, Clone)]
pub struct SugarComaCookieOrderHandler {
    store: Arc<CookieStore>,
}

impl SugarComaCookieOrderHandler {
    /// Serves orders from `store`.
    #[must_use]
    pub const fn new(store: Arc<CookieStore>) -> Self {
        Self { store }
    }
}

impl CommandHandler for SugarComaCookieOrderHandler {
    type Command = SugarComaCookieOrder;

    fn compatible_type(&self) -> &str {
        "SugarComaCookieOrder"
    }

    fn execute(
        &self,
        _command: SugarComaCookieOrder,
    ) -> Result<SugarComaCookieOrderResponse, BoxError> {
        let cookie = self.store.sugar_coma().ok_or(EmptyStore)?;
        Ok(SugarComaCookieOrderResponse {
            sugar_coma_cookie: cookie.clone(),
        })
    }
}

/// Fills [`FirstAvailableGingerCookieOrder`].
#[derive(Debug, Clone)]
pub struct GingerCookieOrderHandler {
    store: Arc<CookieStore>,
}

impl GingerCookieOrderHandler {
    /// Serves orders from `store`.
    #[must_use]
    pub const fn new(store: Arc<CookieStore>) -> Self {
        Self { store }
    }
}

impl CommandHandler for GingerCookieOrderHandler {
    type Command = FirstAvailableGingerCookieOrder;

    fn compatible_type(&self) -> &str {
        "FirstAvailableGingerCookieOrder"
    }

    fn execute(
        &self,
        _command: FirstAvailableGingerCookieOrder,
    ) -> Result<GingerCookieOrderResponse, BoxError> {
        Ok(GingerCookieOrderResponse {
            ginger_cookie: self.store.first_with_addition("Ginger").cloned(),
        })
    }
}

/// Fills [`MaxSugarOrder`].
#[derive(Debug, Clone)]
pub struct MaxSugarOrderHandler {
    store: Arc<CookieStore>,
}

impl MaxSugarOrderHandler {
    /// Serves orders from `store`.
    #[must_use]
    pub const fn new(store: Arc<CookieStore>) -> Self {
        Self { store }
    }
}

impl CommandHandler for MaxSugarOrderHandler {
    type Command = MaxSugarOrder;

    fn compatible_type(&self) -> &str {
        "MaxSugarOrder"
    }

    fn execute(&self, command: MaxSugarOrder) -> Result<MaxSugarOrderResponse, BoxError> {
        let budget = u32::try_from(command.max_sugar_in_grams)?;
        let cookies = self.store.up_to_max_sugar(budget);
        let sugar_total = cookies
            .iter()
            .map(|cookie| u64::from(cookie.sugar_in_grams))
            .sum();
        Ok(MaxSugarOrderResponse {
            cookies,
            sugar_total,
        })
    }
}
