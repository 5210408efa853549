use serde::{Deserialize, Serialize};

/// Google Pay button theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonTheme {
    #[default]
    Dark,
    Light,
}

/// Google Pay button label variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonType {
    /// "Buy with Google Pay"
    #[default]
    Buy,
    Book,
    Checkout,
    Donate,
    Order,
    /// Plain "Google Pay"
    Pay,
    Subscribe,
}

impl std::fmt::Display for ButtonTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ButtonTheme::Dark => write!(f, "dark"),
            ButtonTheme::Light => write!(f, "light"),
        }
    }
}

impl std::fmt::Display for ButtonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ButtonType::Buy => "buy",
            ButtonType::Book => "book",
            ButtonType::Checkout => "checkout",
            ButtonType::Donate => "donate",
            ButtonType::Order => "order",
            ButtonType::Pay => "pay",
            ButtonType::Subscribe => "subscribe",
        };
        write!(f, "{}", name)
    }
}
