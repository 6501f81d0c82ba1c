//! # PhoneRecipient Value Object
//!
//! 配信先の電話番号

use std::fmt;

/// 配信先の電話番号（国番号付き）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneRecipient {
    number: String,
}

impl PhoneRecipient {
    /// 国番号付きの番号からそのまま作成
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
        }
    }

    /// ユーザー入力のローカル番号に国番号を付与して作成
    ///
    /// ```
    /// use photobatch::domain::entities::recipient::PhoneRecipient;
    ///
    /// let recipient = PhoneRecipient::with_country_code("+65", " 91234567 ");
    /// assert_eq!(recipient.number(), "+6591234567");
    /// assert_eq!(recipient.channel_address("whatsapp:"), "whatsapp:+6591234567");
    /// ```
    pub fn with_country_code(country_code: &str, local_number: &str) -> Self {
        Self::new(format!("{}{}", country_code, local_number.trim()))
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    /// チャネルプレフィックス付きのアドレス（例: `whatsapp:+65...`）
    pub fn channel_address(&self, channel_prefix: &str) -> String {
        format!("{}{}", channel_prefix, self.number)
    }
}

impl fmt::Display for PhoneRecipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.number)
    }
}
