//! Presentation shell for the Google Pay button.

use everypay_gpay_types::{ButtonTheme, ButtonType};
use serde::Serialize;

use crate::button::{ButtonState, GooglePayButton, PressOutcome};

/// Test id carried by the rendered button
pub const BUTTON_TEST_ID: &str = "google-pay-button";

/// What the host UI draws for a ready button
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonView {
    pub test_id: String,
    /// JSON array handed to the native button
    pub allowed_payment_methods: String,
    pub theme: ButtonTheme,
    #[serde(rename = "type")]
    pub button_type: ButtonType,
    pub disabled: bool,
}

impl GooglePayButton {
    /// The button to draw, or `None` while it must stay hidden.
    ///
    /// Hidden until initialization reports Google Pay ready, so the native
    /// button never sees a method list without a tokenization specification.
    pub fn render(&self) -> Option<ButtonView> {
        if !matches!(self.state(), ButtonState::Ready | ButtonState::Processing) {
            return None;
        }
        if !self.init_result()?.is_ready {
            return None;
        }

        let methods = self.allowed_payment_methods();
        if methods.is_empty() {
            return None;
        }
        let allowed_payment_methods = serde_json::to_string(&methods).ok()?;

        Some(ButtonView {
            test_id: BUTTON_TEST_ID.to_string(),
            allowed_payment_methods,
            theme: self.props().theme,
            button_type: self.props().button_type,
            disabled: self.is_disabled() || self.is_processing(),
        })
    }

    /// Forward a tap from the rendered button.
    ///
    /// Taps on a hidden button are dropped.
    pub async fn tap(&self) -> PressOutcome {
        match self.render() {
            Some(view) if !view.disabled => self.press().await,
            _ => PressOutcome::Ignored,
        }
    }
}
