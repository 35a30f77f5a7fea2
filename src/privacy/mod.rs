//! Privacy preferences page and its sub-dialogs

pub mod dialogs;
pub mod page;
pub mod tokens;
pub mod widgets;

pub use dialogs::{
    ClearHistoryDialog, CookiesExceptionsDialog, DialogResult, HostEdit, HostExceptions,
    ScriptedClearHistory, ScriptedCookiesExceptions,
};
pub use page::{
    PageServices, PageSignal, PrivacyEvent, PrivacyPage, PrivacySnapshot, PAGE_ORIGIN,
    PASSWORDS_ACTION,
};
pub use tokens::{
    ClearHistoryCategory, CookiesKeepMode, CookiesPolicy, DoNotTrackPolicy, OptionToken,
    ThirdPartyCookiesPolicy,
};
pub use widgets::{Button, CheckBox, ComboBox, ComboItem, Section};
