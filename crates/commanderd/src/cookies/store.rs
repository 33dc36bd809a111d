//! In-memory cookie inventory backing the demo orders.

use serde::{Deserialize, Serialize};

/// A cookie on offer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    /// Display name.
    pub name: String,
    /// Sugar content in grams.
    pub sugar_in_grams: u32,
    /// Lower-case ingredients added to the base dough.
    pub additions: Vec<String>,
}

impl Cookie {
    /// Builds a cookie from borrowed parts.
    #[must_use]
    pub fn new(name: &str, sugar_in_grams: u32, additions: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            sugar_in_grams,
            additions: additions.iter().map(|&addition| addition.to_owned()).collect(),
        }
    }
}

/// Fixed, ordered cookie inventory.
///
/// The store never changes after construction, so handlers share it freely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieStore {
    cookies: Vec<Cookie>,
}

impl CookieStore {
    /// Creates a store holding `cookies` in the given order.
    #[must_use]
    pub const fn new(cookies: Vec<Cookie>) -> Self {
        Self { cookies }
    }

    /// The house selection.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            Cookie::new("Plain", 15, &[]),
            Cookie::new("Chocolate Chip", 30, &["chocolate chip"]),
            Cookie::new("Peanut Butter", 20, &["peanut butter"]),
            Cookie::new(
                "Peanut Butter Chocolate Chip",
                50,
                &["peanut butter", "chocolate chip"],
            ),
            Cookie::new("Snicker-doodles", 60, &["cinnamon", "sugar"]),
            Cookie::new("Sugar", 90, &["sugar", "more sugar"]),
            Cookie::new("Ginger", 60, &["ginger", "sugar"]),
            Cookie::new(
                "Ginger Sugar peanut butter",
                150,
                &["ginger", "sugar", "peanut butter", "more sugar"],
            ),
            Cookie::new(
                "Sugar Sugar",
                300,
                &["sugar", "more sugar", "even more sugar", "diabetes"],
            ),
        ])
    }

    /// Cookies in store order.
    #[must_use]
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// The sweetest cookie; the earliest one wins a tie.
    #[must_use]
    pub fn sugar_coma(&self) -> Option<&Cookie> {
        self.cookies.iter().reduce(|best, candidate| {
            if candidate.sugar_in_grams > best.sugar_in_grams {
                candidate
            } else {
                best
            }
        })
    }

    /// First cookie with an addition containing `addition`, compared
    /// case-insensitively.
    #[must_use]
    pub fn first_with_addition(&self, addition: &str) -> Option<&Cookie> {
        let wanted = addition.to_lowercase();
        self.cookies
            .iter()
            .find(|cookie| cookie.additions.iter().any(|have| have.contains(&wanted)))
    }

    /// Walks the store in order, wrapping around, and keeps taking cookies
    /// until the next one would push the total past `max_sugar_in_grams`.
    #[must_use]
    pub fn up_to_max_sugar(&self, max_sugar_in_grams: u32) -> Vec<Cookie> {
        let sugar_per_round: u64 = self
            .cookies
            .iter()
            .map(|cookie| u64::from(cookie.sugar_in_grams))
            .sum();
        if sugar_per_round == 0 {
            return Vec::new();
        }

        let limit = u64::from(max_sugar_in_grams);
        let mut total = 0_u64;
        self.cookies
            .iter()
            .cycle()
            .take_while(|cookie| {
                let next = total + u64::from(cookie.sugar_in_grams);
                if next > limit {
                    return false;
                }
                total = next;
                true
            })
            .cloned()
            .collect()
    }
}
