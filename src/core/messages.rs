//! User-facing texts (Arabic).
//!
//! Failure texts per kind live next to the classifier in
//! `download::ytdlp_errors`.

use indoc::indoc;

/// `/start` reply, sent as MarkdownV2 (list dashes are escaped)
pub const WELCOME: &str = indoc! {"
    🎥 *مرحباً في بوت التحميل* 🎥

    أرسل لي رابط فيديو من:
    \\- YouTube
    \\- TikTok
    \\- Twitter

    ⚡ يعمل 24/7 على السحابة
"};

/// `/help` reply, plain text
pub const HELP: &str = indoc! {"
    📖 طريقة الاستخدام:
    1. أرسل رابط الفيديو (يبدأ بـ http:// أو https://)
    2. انتظر حتى يكتمل التحميل
    3. استلم الفيديو هنا

    الأوامر:
    /start - رسالة الترحيب
    /help - هذه المساعدة
    /cancel - إلغاء التحميل الجاري
"};

pub const INVALID_LINK: &str = "⚠️ الرابط غير صحيح";

pub const PROGRESS: &str = "⏳ جاري التحميل...";

pub const BUSY: &str = "⏳ يوجد تحميل قيد التنفيذ، انتظر حتى ينتهي أو أرسل /cancel";

pub const CANCEL_REQUESTED: &str = "🛑 جاري إلغاء التحميل...";

pub const NOTHING_TO_CANCEL: &str = "ℹ️ لا يوجد تحميل قيد التنفيذ";

/// Caption title when the extractor reported none
pub const DEFAULT_TITLE: &str = "فيديو";
