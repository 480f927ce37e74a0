//! Localized text catalog.
//!
//! Messages and notices carry a [`TextKey`] rather than rendered text so the
//! presentation layer can re-render them when the user switches locale.
//! Keys missing from a locale fall back to English.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported UI locales, cycled in the order en -> hi -> bn -> en.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Hi,
    Bn,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Hi, Locale::Bn];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Hi => "hi",
            Locale::Bn => "bn",
        }
    }

    /// BCP 47 tag handed to the speech recognizer.
    pub fn speech_code(&self) -> &'static str {
        match self {
            Locale::En => "en-US",
            Locale::Hi => "hi-IN",
            Locale::Bn => "bn-IN",
        }
    }

    /// Name of the locale in its own script, shown on the language toggle.
    pub fn native_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Hi => "हिन्दी",
            Locale::Bn => "বাংলা",
        }
    }

    /// The locale the language toggle switches to.
    pub fn next(&self) -> Locale {
        match self {
            Locale::En => Locale::Hi,
            Locale::Hi => Locale::Bn,
            Locale::Bn => Locale::En,
        }
    }

    /// Parse a locale code, falling back to English for anything unknown.
    pub fn from_code_or_default(code: &str) -> Locale {
        code.parse().unwrap_or_default()
    }

    /// Render `key` in this locale, falling back to English.
    pub fn text(&self, key: TextKey) -> &'static str {
        let localized = match self {
            Locale::En => None,
            Locale::Hi => hindi(key),
            Locale::Bn => bengali(key),
        };
        localized.unwrap_or_else(|| english(key))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" => Ok(Locale::En),
            "hi" | "hi-in" => Ok(Locale::Hi),
            "bn" | "bn-in" => Ok(Locale::Bn),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// Symbolic key into the text catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextKey {
    Title,
    DocAssist,
    UploadTitle,
    DocPreviewTitle,
    DocPreviewBody,
    TipsTitle,
    Tip1,
    Tip2,
    MenuHistory,
    MenuProfile,
    HistoryTitle,
    HistoryEmpty,
    ChatTitle,
    ChatSubtitle,
    InitialBotMessage,
    DemoBotReply,
    MicTitle,
    ImgTitle,
    Placeholder,
    Send,
    StopListening,
    StartListening,
    NoReplyReceived,
    ChatError,
    BotTyping,
    ImageOnly,
    UploadFailed,
    SpeechUnsupported,
    MicrophoneDenied,
}

fn english(key: TextKey) -> &'static str {
    match key {
        TextKey::Title => "LokSahayak",
        TextKey::DocAssist => "Document Assistant",
        TextKey::UploadTitle => "Upload Document",
        TextKey::DocPreviewTitle => "Document preview",
        TextKey::DocPreviewBody => {
            "After you upload a document, its text will appear here and you can ask questions about it in the chat."
        }
        TextKey::TipsTitle => "Tips",
        TextKey::Tip1 => "Upload PDFs or images",
        TextKey::Tip2 => "Try: \"Summarize the document\"",
        TextKey::MenuHistory => "History",
        TextKey::MenuProfile => "Profile",
        TextKey::HistoryTitle => "Conversation history",
        TextKey::HistoryEmpty => "No messages",
        TextKey::ChatTitle => "Chat",
        TextKey::ChatSubtitle => "Ask questions about your document",
        TextKey::InitialBotMessage => {
            "Hi! Upload a document on the left and ask questions about it."
        }
        TextKey::DemoBotReply => "This is an automated reply. Replace with your AI call.",
        TextKey::MicTitle => "Voice",
        TextKey::ImgTitle => "Upload image",
        TextKey::Placeholder => "Type your message...",
        TextKey::Send => "Send",
        TextKey::StopListening => "Stop listening",
        TextKey::StartListening => "Start listening",
        TextKey::NoReplyReceived => "No reply received.",
        TextKey::ChatError => "Sorry, something went wrong. Please try again.",
        TextKey::BotTyping => "...",
        TextKey::ImageOnly => "Please select an image file.",
        TextKey::UploadFailed => "Image upload failed. Please try again.",
        TextKey::SpeechUnsupported => "Sorry, speech recognition is not supported on this device.",
        TextKey::MicrophoneDenied => "You must allow microphone access to use this feature.",
    }
}

fn hindi(key: TextKey) -> Option<&'static str> {
    let text = match key {
        TextKey::Title => "लोक सहायक",
        TextKey::DocAssist => "दस्तावेज़ सहायक",
        TextKey::UploadTitle => "दस्तावेज़ अपलोड करें",
        TextKey::DocPreviewTitle => "दस्तावेज़ पूर्वावलोकन",
        TextKey::DocPreviewBody => {
            "दस्तावेज़ अपलोड करने के बाद, उसका टेक्स्ट यहाँ दिखाई देगा और आप चैट में उसके बारे में प्रश्न पूछ सकते हैं।"
        }
        TextKey::TipsTitle => "सुझाव",
        TextKey::Tip1 => "पीडीएफ या छवियां अपलोड करें",
        TextKey::Tip2 => "प्रयास करें: \"दस्तावेज़ को सारांशित करें\"",
        TextKey::MenuHistory => "इतिहास",
        TextKey::MenuProfile => "प्रोफ़ाइल",
        TextKey::HistoryTitle => "बातचीत का इतिहास",
        TextKey::HistoryEmpty => "कोई संदेश नहीं",
        TextKey::ChatTitle => "चैट",
        TextKey::ChatSubtitle => "अपने दस्तावेज़ के बारे में प्रश्न पूछें",
        TextKey::InitialBotMessage => {
            "नमस्ते! बाईं ओर एक दस्तावेज़ अपलोड करें और उसके बारे में प्रश्न पूछें।"
        }
        TextKey::DemoBotReply => "यह एक स्वचालित उत्तर है। इसे अपने एआई कॉल से बदलें।",
        TextKey::MicTitle => "आवाज़",
        TextKey::ImgTitle => "छवि अपलोड करें",
        TextKey::Placeholder => "अपना संदेश टाइप करें...",
        TextKey::Send => "भेजें",
        TextKey::StopListening => "सुनना बंद करें",
        TextKey::StartListening => "सुनना शुरू करें",
        _ => return None,
    };
    Some(text)
}

fn bengali(key: TextKey) -> Option<&'static str> {
    let text = match key {
        TextKey::Title => "লোক সহায়ক",
        TextKey::DocAssist => "ডকুমেন্ট অ্যাসিস্ট্যান্ট",
        TextKey::UploadTitle => "ডকুমেন্ট আপলোড করুন",
        TextKey::DocPreviewTitle => "ডকুমেন্ট প্রিভিউ",
        TextKey::DocPreviewBody => {
            "আপনি একটি ডকুমেন্ট আপলোড করার পরে, তার টেক্সট এখানে উপস্থিত হবে এবং আপনি চ্যাটে এটি সম্পর্কে প্রশ্ন জিজ্ঞাসা করতে পারেন।"
        }
        TextKey::TipsTitle => "টিপস",
        TextKey::Tip1 => "পিডিএফ বা ছবি আপলোড করুন",
        TextKey::Tip2 => "চেষ্টা করুন: \"ডকুমেন্টটি সংক্ষিপ্ত করুন\"",
        TextKey::MenuHistory => "ইতিহাস",
        TextKey::MenuProfile => "প্রোফাইল",
        TextKey::HistoryTitle => "কথোপকথনের ইতিহাস",
        TextKey::HistoryEmpty => "কোনো মেসেজ নেই",
        TextKey::ChatTitle => "চ্যাট",
        TextKey::ChatSubtitle => "আপনার ডকুমেন্ট সম্পর্কে প্রশ্ন জিজ্ঞাসা করুন",
        TextKey::InitialBotMessage => {
            "হাই! বাম দিকে একটি ডকুমেন্ট আপলোড করুন এবং এটি সম্পর্কে প্রশ্ন জিজ্ঞাসা করুন।"
        }
        TextKey::DemoBotReply => "এটি একটি স্বয়ংক্রিয় উত্তর। আপনার এআই কল দিয়ে প্রতিস্থাপন করুন।",
        TextKey::MicTitle => "ভয়েস",
        TextKey::ImgTitle => "ছবি আপলোড করুন",
        TextKey::Placeholder => "আপনার বার্তা টাইপ করুন...",
        TextKey::Send => "পাঠান",
        TextKey::StopListening => "শোনা বন্ধ করুন",
        TextKey::StartListening => "শোনা শুরু করুন",
        _ => return None,
    };
    Some(text)
}
