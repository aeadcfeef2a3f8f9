use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Self::Ar)
    }
}

impl FromStr for Language {
    type Err = String;

    /// Accepts bare codes and locale tags such as `ar-SA`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s.split(['-', '_']).next().unwrap_or_default();
        match primary.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ar" => Ok(Self::Ar),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

// (key, en, ar)
const ENTRIES: &[(&str, &str, &str)] = &[
    ("sessionExpired", "Session expired", "انتهت صلاحية الجلسة"),
    ("pleaseLogin", "Please log in again", "الرجاء تسجيل الدخول مرة أخرى"),
    ("pleaseLoginAgain", "Please log in again", "يرجى تسجيل الدخول مجددًا"),
    ("accountBlocked", "Account blocked", "الحساب محظور"),
    ("accountBlockedDescription", "This account has been blocked. Contact support.", "تم حظر هذا الحساب. يرجى التواصل مع الدعم"),
    ("noCreditsLeft", "No credits left", "لا يوجد رصيد متبقٍ"),
    ("noCreditsLeftDescription", "Your account has no remaining credits.", "لا يوجد رصيد متبقٍ في حسابك"),
    ("loginSuccess", "Login successful", "تم تسجيل الدخول بنجاح"),
    ("welcomeBack", "Welcome back", "مرحبًا بعودتك"),
    ("loginFailed", "Login failed", "فشل تسجيل الدخول"),
    ("unexpectedError", "Unexpected error", "حدث خطأ غير متوقع"),
    ("invalidOTP", "Invalid verification code", "رمز التحقق غير صحيح"),
    ("invalidOTPDescription", "Please try again with the correct code", "يرجى المحاولة مرة أخرى بالرمز الصحيح"),
    ("verificationFailed", "Verification failed", "فشل التحقق"),
    ("logoutSuccess", "Successfully logged out", "تم تسجيل الخروج بنجاح"),
    ("comeBackSoon", "Come back soon", "نراك قريبًا"),
    ("logoutFailed", "Logout failed", "فشل تسجيل الخروج"),
    ("deleteSuccess", "Deleted", "تم الحذف"),
    ("deleteUserSuccess", "User deleted successfully", "تم حذف المستخدم بنجاح"),
    ("deleteUserFailed", "Failed to delete user", "فشل في حذف المستخدم"),
    ("updateSuccess", "Updated", "تم التحديث"),
    ("updateUserSuccess", "User information updated successfully", "تم تحديث بيانات المستخدم بنجاح"),
    ("updateUserFailed", "Failed to update user data", "فشل في تحديث بيانات المستخدم"),
    ("addSuccess", "Added", "تمت الإضافة"),
    ("addUserSuccess", "User added successfully", "تم إضافة المستخدم بنجاح"),
    ("addUserError", "Failed to add user", "فشل في إضافة المستخدم"),
    ("renewSuccess", "Renewed", "تم التجديد"),
    ("renewUserSuccess", "User account renewed successfully", "تم تجديد حساب المستخدم بنجاح"),
    ("renewUserFailed", "Failed to renew user account", "فشل في تجديد حساب المستخدم"),
    ("addCreditsSuccess", "Credits added successfully", "تمت إضافة الرصيد بنجاح"),
    ("error", "Error", "خطأ"),
    ("operations", "Operations", "العمليات"),
    ("noOperationsFound", "No operations data available", "لا توجد بيانات عمليات"),
];

lazy_static! {
    static ref DICTIONARY: HashMap<&'static str, (&'static str, &'static str)> = ENTRIES
        .iter()
        .map(|(key, en, ar)| (*key, (*en, *ar)))
        .collect();
}

/// Process-wide translation lookup for the two console locales.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Missing keys are returned verbatim.
    pub fn t(&self, key: &str) -> String {
        match DICTIONARY.get(key) {
            Some((en, ar)) => match self.language {
                Language::En => en.to_string(),
                Language::Ar => ar.to_string(),
            },
            None => {
                tracing::warn!("Translation key not found: {}", key);
                key.to_string()
            }
        }
    }
}
