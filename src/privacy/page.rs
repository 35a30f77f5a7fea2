//! Privacy preferences page view-model
//!
//! The page mirrors eleven settings in form controls. It reads them once in
//! [`PrivacyPage::load`], changes only its own state while the user interacts
//! with it, and writes everything back in [`PrivacyPage::save`].
//!
//! User interaction arrives as [`PrivacyEvent`]s. Each event is routed to one
//! named handler by [`PrivacyPage::handle`].

use super::dialogs::{ClearHistoryDialog, CookiesExceptionsDialog, DialogResult};
use super::tokens::{
    CookiesKeepMode, CookiesPolicy, DoNotTrackPolicy, OptionToken, ThirdPartyCookiesPolicy,
};
use super::widgets::{Button, CheckBox, ComboBox, Section};
use crate::error::Result;
use crate::keyboard::actions::{ActionDispatcher, Parameters};
use crate::options::OptionKey;
use crate::store::SettingsStore;
use crate::types::PrefValue;
use serde::Serialize;

/// Name the page identifies itself with when triggering actions
pub const PAGE_ORIGIN: &str = "preferences/privacy";

/// Action opening the password manager
pub const PASSWORDS_ACTION: &str = "Passwords";

const DO_NOT_TRACK_FALLBACK: usize = 2;
const COOKIES_POLICY_FALLBACK: usize = 0;
const COOKIES_KEEP_MODE_FALLBACK: usize = 0;
const THIRD_PARTY_POLICY_FALLBACK: usize = 0;

/// Notifications raised by the page for its container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSignal {
    /// Settings held by the page changed outside the plain form controls
    SettingsModified,
}

/// User interaction with the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivacyEvent {
    DoNotTrackSelected(DoNotTrackPolicy),
    PrivateModeToggled(bool),
    RememberBrowsingToggled(bool),
    RememberDownloadsToggled(bool),
    CookiesToggled(bool),
    CookiesPolicySelected(CookiesPolicy),
    KeepModeSelected(CookiesKeepMode),
    ThirdPartyPolicySelected(ThirdPartyCookiesPolicy),
    ThirdPartyExceptionsClicked,
    ClearHistoryToggled(bool),
    ClearHistoryClicked,
    RememberPasswordsToggled(bool),
    ManagePasswordsClicked,
}

/// Collaborators the page calls into while handling events
pub struct PageServices<'s> {
    pub cookies_exceptions: &'s mut dyn CookiesExceptionsDialog,
    pub clear_history: &'s mut dyn ClearHistoryDialog,
    pub dispatcher: &'s mut dyn ActionDispatcher,
}

/// Serializable view of the page state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrivacySnapshot {
    pub do_not_track: DoNotTrackPolicy,
    pub private_mode: bool,
    pub history_enabled: bool,
    pub remember_browsing: bool,
    pub remember_downloads: bool,
    pub cookies_enabled: bool,
    pub cookies_section_enabled: bool,
    pub cookies_policy: CookiesPolicy,
    pub cookies_keep_mode: CookiesKeepMode,
    pub third_party_cookies_policy: ThirdPartyCookiesPolicy,
    pub third_party_accepted_hosts: Vec<String>,
    pub third_party_rejected_hosts: Vec<String>,
    pub clear_history_on_close: bool,
    pub clear_history_button_enabled: bool,
    pub clear_history_settings: Vec<String>,
    pub remember_passwords: bool,
}

#[derive(Debug, Clone)]
pub struct PrivacyPage {
    do_not_track: ComboBox<DoNotTrackPolicy>,
    private_mode: CheckBox,
    history_section: Section,
    remember_browsing: CheckBox,
    remember_downloads: CheckBox,
    cookies_enabled: CheckBox,
    cookies_section: Section,
    cookies_policy: ComboBox<CookiesPolicy>,
    cookies_keep_mode: ComboBox<CookiesKeepMode>,
    third_party_policy: ComboBox<ThirdPartyCookiesPolicy>,
    third_party_accepted_hosts: Vec<String>,
    third_party_rejected_hosts: Vec<String>,
    clear_history: CheckBox,
    clear_history_button: Button,
    clear_history_settings: Vec<String>,
    remember_passwords: CheckBox,
    signals: Vec<PageSignal>,
}

impl PrivacyPage {
    /// Build the page from the current store values
    pub fn load(store: &dyn SettingsStore) -> Self {
        let mut clear_history_settings = store.get_string_list(OptionKey::HistoryClearOnClose);
        clear_history_settings.retain(|s| !s.is_empty());

        let mut do_not_track = ComboBox::new(DoNotTrackPolicy::ALL, DoNotTrackPolicy::DoNotAllow);
        do_not_track.load(
            &store.get_string(OptionKey::NetworkDoNotTrackPolicy),
            DO_NOT_TRACK_FALLBACK,
        );

        let private_mode = CheckBox::new(store.get_bool(OptionKey::BrowserPrivateMode));

        let stored_policy = store.get_string(OptionKey::NetworkCookiesPolicy);
        let cookies_enabled = CheckBox::new(stored_policy != CookiesPolicy::Ignore.token());
        let mut cookies_policy = ComboBox::new(CookiesPolicy::SELECTABLE, CookiesPolicy::AcceptAll);
        cookies_policy.load(&stored_policy, COOKIES_POLICY_FALLBACK);

        let mut cookies_keep_mode =
            ComboBox::new(CookiesKeepMode::ALL, CookiesKeepMode::KeepUntilExpires);
        cookies_keep_mode.load(
            &store.get_string(OptionKey::NetworkCookiesKeepMode),
            COOKIES_KEEP_MODE_FALLBACK,
        );

        let mut third_party_policy =
            ComboBox::new(ThirdPartyCookiesPolicy::ALL, ThirdPartyCookiesPolicy::AcceptAll);
        third_party_policy.load(
            &store.get_string(OptionKey::NetworkThirdPartyCookiesPolicy),
            THIRD_PARTY_POLICY_FALLBACK,
        );

        let has_clear_settings = !clear_history_settings.is_empty();
        let page = PrivacyPage {
            do_not_track,
            history_section: Section {
                enabled: !private_mode.checked,
            },
            private_mode,
            remember_browsing: CheckBox::new(store.get_bool(OptionKey::HistoryRememberBrowsing)),
            remember_downloads: CheckBox::new(
                store.get_bool(OptionKey::HistoryRememberDownloads),
            ),
            cookies_section: Section {
                enabled: cookies_enabled.checked,
            },
            cookies_enabled,
            cookies_policy,
            cookies_keep_mode,
            third_party_policy,
            third_party_accepted_hosts: store
                .get_string_list(OptionKey::NetworkThirdPartyCookiesAcceptedHosts),
            third_party_rejected_hosts: store
                .get_string_list(OptionKey::NetworkThirdPartyCookiesRejectedHosts),
            clear_history: CheckBox::new(has_clear_settings),
            clear_history_button: Button {
                enabled: has_clear_settings,
            },
            clear_history_settings,
            remember_passwords: CheckBox::new(store.get_bool(OptionKey::BrowserRememberPasswords)),
            signals: Vec::new(),
        };
        tracing::debug!(
            do_not_track = %page.do_not_track.current_data(),
            cookies_enabled = page.cookies_enabled.checked,
            clear_on_close = page.clear_history_settings.len(),
            "loaded privacy page"
        );
        page
    }

    /// Route an event to its handler
    pub fn handle(&mut self, event: PrivacyEvent, services: &mut PageServices<'_>) {
        match event {
            PrivacyEvent::DoNotTrackSelected(policy) => self.on_do_not_track_selected(policy),
            PrivacyEvent::PrivateModeToggled(checked) => self.on_private_mode_toggled(checked),
            PrivacyEvent::RememberBrowsingToggled(checked) => {
                self.on_remember_browsing_toggled(checked)
            }
            PrivacyEvent::RememberDownloadsToggled(checked) => {
                self.on_remember_downloads_toggled(checked)
            }
            PrivacyEvent::CookiesToggled(checked) => self.on_cookies_toggled(checked),
            PrivacyEvent::CookiesPolicySelected(policy) => self.on_cookies_policy_selected(policy),
            PrivacyEvent::KeepModeSelected(mode) => self.on_keep_mode_selected(mode),
            PrivacyEvent::ThirdPartyPolicySelected(policy) => {
                self.on_third_party_policy_selected(policy)
            }
            PrivacyEvent::ThirdPartyExceptionsClicked => {
                self.setup_third_party_cookies_exceptions(&mut *services.cookies_exceptions)
            }
            PrivacyEvent::ClearHistoryToggled(checked) => self.on_clear_history_toggled(checked),
            PrivacyEvent::ClearHistoryClicked => {
                self.setup_clear_history(&mut *services.clear_history)
            }
            PrivacyEvent::RememberPasswordsToggled(checked) => {
                self.on_remember_passwords_toggled(checked)
            }
            PrivacyEvent::ManagePasswordsClicked => {
                self.manage_passwords(&mut *services.dispatcher)
            }
        }
    }

    pub fn on_do_not_track_selected(&mut self, policy: DoNotTrackPolicy) {
        self.do_not_track.set_current(policy);
    }

    pub fn on_private_mode_toggled(&mut self, checked: bool) {
        self.private_mode.checked = checked;
        self.history_section.enabled = !checked;
    }

    pub fn on_remember_browsing_toggled(&mut self, checked: bool) {
        self.remember_browsing.checked = checked;
    }

    pub fn on_remember_downloads_toggled(&mut self, checked: bool) {
        self.remember_downloads.checked = checked;
    }

    pub fn on_cookies_toggled(&mut self, checked: bool) {
        self.cookies_enabled.checked = checked;
        self.cookies_section.enabled = checked;
    }

    /// `CookiesPolicy::Ignore` is not a choice; use the cookies check box
    pub fn on_cookies_policy_selected(&mut self, policy: CookiesPolicy) {
        if !self.cookies_policy.set_current(policy) {
            tracing::debug!(policy = %policy, "cookies policy is not selectable");
        }
    }

    pub fn on_keep_mode_selected(&mut self, mode: CookiesKeepMode) {
        self.cookies_keep_mode.set_current(mode);
    }

    pub fn on_third_party_policy_selected(&mut self, policy: ThirdPartyCookiesPolicy) {
        self.third_party_policy.set_current(policy);
    }

    pub fn on_clear_history_toggled(&mut self, checked: bool) {
        self.clear_history.checked = checked;
        self.clear_history_button.enabled = checked;
    }

    pub fn on_remember_passwords_toggled(&mut self, checked: bool) {
        self.remember_passwords.checked = checked;
    }

    /// Edit the third-party cookie host exceptions in `dialog`
    pub fn setup_third_party_cookies_exceptions(
        &mut self,
        dialog: &mut dyn CookiesExceptionsDialog,
    ) {
        match dialog.exec(
            &self.third_party_accepted_hosts,
            &self.third_party_rejected_hosts,
        ) {
            DialogResult::Accepted(hosts) => {
                self.third_party_accepted_hosts = hosts.accepted;
                self.third_party_rejected_hosts = hosts.rejected;
                self.signals.push(PageSignal::SettingsModified);
            }
            DialogResult::Cancelled => {}
        }
    }

    /// Edit the clear-on-close categories in `dialog`
    pub fn setup_clear_history(&mut self, dialog: &mut dyn ClearHistoryDialog) {
        if let DialogResult::Accepted(settings) = dialog.exec(&self.clear_history_settings, true) {
            self.clear_history_settings = settings;
            self.signals.push(PageSignal::SettingsModified);
        }

        let has_settings = !self.clear_history_settings.is_empty();
        self.clear_history.checked = has_settings;
        self.clear_history_button.enabled = has_settings;
    }

    pub fn manage_passwords(&mut self, dispatcher: &mut dyn ActionDispatcher) {
        dispatcher.trigger(PASSWORDS_ACTION, &Parameters::new(), PAGE_ORIGIN);
    }

    /// Write every setting back to `store`.
    ///
    /// All eleven writes are attempted; the first failure is returned.
    pub fn save(&self, store: &mut dyn SettingsStore) -> Result<()> {
        let cookies_policy = if self.cookies_enabled.checked {
            self.cookies_policy.current_data()
        } else {
            CookiesPolicy::Ignore
        };
        let clear_on_close = if self.clear_history.checked {
            self.clear_history_settings.clone()
        } else {
            Vec::new()
        };

        let writes: [(OptionKey, PrefValue); 11] = [
            (
                OptionKey::NetworkDoNotTrackPolicy,
                self.do_not_track.current_data().token().into(),
            ),
            (OptionKey::BrowserPrivateMode, self.private_mode.checked.into()),
            (
                OptionKey::HistoryRememberBrowsing,
                self.remember_browsing.checked.into(),
            ),
            (
                OptionKey::HistoryRememberDownloads,
                self.remember_downloads.checked.into(),
            ),
            (OptionKey::NetworkCookiesPolicy, cookies_policy.token().into()),
            (
                OptionKey::NetworkCookiesKeepMode,
                self.cookies_keep_mode.current_data().token().into(),
            ),
            (
                OptionKey::NetworkThirdPartyCookiesPolicy,
                self.third_party_policy.current_data().token().into(),
            ),
            (
                OptionKey::NetworkThirdPartyCookiesAcceptedHosts,
                self.third_party_accepted_hosts.clone().into(),
            ),
            (
                OptionKey::NetworkThirdPartyCookiesRejectedHosts,
                self.third_party_rejected_hosts.clone().into(),
            ),
            (OptionKey::HistoryClearOnClose, clear_on_close.into()),
            (
                OptionKey::BrowserRememberPasswords,
                self.remember_passwords.checked.into(),
            ),
        ];

        let mut first_error = None;
        for (key, value) in writes {
            if let Err(e) = store.set(key, value) {
                tracing::warn!(option = %key, "failed to save option: {}", e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Drain the signals raised since the last call
    pub fn take_signals(&mut self) -> Vec<PageSignal> {
        std::mem::take(&mut self.signals)
    }

    /// Re-apply item labels after a locale change
    pub fn retranslate(&mut self, translate: &dyn Fn(&str) -> String) {
        self.do_not_track.retranslate(translate);
        self.cookies_policy.retranslate(translate);
        self.cookies_keep_mode.retranslate(translate);
        self.third_party_policy.retranslate(translate);
    }

    pub fn snapshot(&self) -> PrivacySnapshot {
        PrivacySnapshot {
            do_not_track: self.do_not_track.current_data(),
            private_mode: self.private_mode.checked,
            history_enabled: self.history_section.enabled,
            remember_browsing: self.remember_browsing.checked,
            remember_downloads: self.remember_downloads.checked,
            cookies_enabled: self.cookies_enabled.checked,
            cookies_section_enabled: self.cookies_section.enabled,
            cookies_policy: self.cookies_policy.current_data(),
            cookies_keep_mode: self.cookies_keep_mode.current_data(),
            third_party_cookies_policy: self.third_party_policy.current_data(),
            third_party_accepted_hosts: self.third_party_accepted_hosts.clone(),
            third_party_rejected_hosts: self.third_party_rejected_hosts.clone(),
            clear_history_on_close: self.clear_history.checked,
            clear_history_button_enabled: self.clear_history_button.enabled,
            clear_history_settings: self.clear_history_settings.clone(),
            remember_passwords: self.remember_passwords.checked,
        }
    }

    pub fn do_not_track(&self) -> &ComboBox<DoNotTrackPolicy> {
        &self.do_not_track
    }

    pub fn private_mode(&self) -> CheckBox {
        self.private_mode
    }

    pub fn history_section(&self) -> Section {
        self.history_section
    }

    pub fn remember_browsing(&self) -> CheckBox {
        self.remember_browsing
    }

    pub fn remember_downloads(&self) -> CheckBox {
        self.remember_downloads
    }

    pub fn cookies_enabled(&self) -> CheckBox {
        self.cookies_enabled
    }

    pub fn cookies_section(&self) -> Section {
        self.cookies_section
    }

    pub fn cookies_policy(&self) -> &ComboBox<CookiesPolicy> {
        &self.cookies_policy
    }

    pub fn cookies_keep_mode(&self) -> &ComboBox<CookiesKeepMode> {
        &self.cookies_keep_mode
    }

    pub fn third_party_policy(&self) -> &ComboBox<ThirdPartyCookiesPolicy> {
        &self.third_party_policy
    }

    pub fn third_party_accepted_hosts(&self) -> &[String] {
        &self.third_party_accepted_hosts
    }

    pub fn third_party_rejected_hosts(&self) -> &[String] {
        &self.third_party_rejected_hosts
    }

    pub fn clear_history(&self) -> CheckBox {
        self.clear_history
    }

    pub fn clear_history_button(&self) -> Button {
        self.clear_history_button
    }

    pub fn clear_history_settings(&self) -> &[String] {
        &self.clear_history_settings
    }

    pub fn remember_passwords(&self) -> CheckBox {
        self.remember_passwords
    }
}
