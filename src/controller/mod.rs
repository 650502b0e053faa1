//! Aggregation controller
//!
//! Owns the providers, fans classified input out to them, merges their
//! matches into a ranked `SuggestionList`, and decides when the merged list
//! is stable enough to commit to observers. Commit timing is the whole
//! game: committing every provider update makes the popup flicker,
//! committing too rarely makes it laggy.
//!
//! The controller runs as a single logical flow. Asynchronous providers and
//! the debounce timer communicate with it only through `ControllerEvent`s
//! posted to its channel; nothing here is locked or shared.

mod timer;

use crate::config::Settings;
use crate::input::{InputType, SchemePolicy, SuggestionInput};
use crate::provider::{fill_url_template, Provider};
use crate::results::{MatchType, NavigationKind, SuggestionList, SuggestionMatch};
use std::collections::HashSet;
use std::time::Duration;
use timer::DebounceTimer;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Relevance of the synthesized search-what-you-typed fallback.
const FALLBACK_RELEVANCE: i32 = 1300;

/// Events delivered to the controller's channel.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    /// A provider's state changed. `matches_changed` is false when only the
    /// done flag moved.
    ProviderUpdate { matches_changed: bool },
    /// The debounce timer for the tagged generation elapsed.
    DebounceElapsed(u64),
}

/// Cloneable sender handle given to asynchronous providers.
#[derive(Clone)]
pub struct ControllerHandle {
    events: mpsc::UnboundedSender<ControllerEvent>,
}

impl ControllerHandle {
    /// Report a provider state change. Safe to call from any task; the
    /// controller processes it on its own flow.
    pub fn on_provider_update(&self, matches_changed: bool) {
        let _ = self
            .events
            .send(ControllerEvent::ProviderUpdate { matches_changed });
    }
}

/// Receives committed results. `on_result_changed` fires for every commit;
/// `on_default_match_changed` additionally fires when the edit field should
/// refresh, and always after `on_result_changed` for the same commit.
pub trait SuggestionObserver: Send {
    fn on_result_changed(&mut self, result: &SuggestionList);
    fn on_default_match_changed(&mut self, result: &SuggestionList);
}

pub struct SuggestionController {
    providers: Vec<Box<dyn Provider>>,
    observers: Vec<Box<dyn SuggestionObserver>>,
    input: SuggestionInput,
    /// Last committed result, what observers currently see.
    result: SuggestionList,
    /// Freshest merge of provider matches, not necessarily committed.
    latest_result: SuggestionList,
    policy: SchemePolicy,
    max_matches: usize,
    search_url_template: String,
    history_url_template: String,
    overflow_provider: Option<String>,
    timer: DebounceTimer,
    events_tx: mpsc::UnboundedSender<ControllerEvent>,
    events_rx: mpsc::UnboundedReceiver<ControllerEvent>,
    /// True when `latest_result` holds changes `result` hasn't seen.
    updated_latest_result: bool,
    /// True once a full debounce interval has passed without a commit.
    delay_interval_has_passed: bool,
    have_committed_during_this_query: bool,
    done: bool,
    query_in_progress: bool,
}

impl SuggestionController {
    pub fn new(settings: &Settings) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let timer = DebounceTimer::new(
            events_tx.clone(),
            Duration::from_millis(settings.limits.commit_delay_ms),
        );
        Self {
            providers: Vec::new(),
            observers: Vec::new(),
            input: SuggestionInput::default(),
            result: SuggestionList::new(),
            latest_result: SuggestionList::new(),
            policy: SchemePolicy::from_settings(&settings.schemes),
            max_matches: settings.limits.max_matches,
            search_url_template: settings.suggest.search_url_template.clone(),
            history_url_template: settings.suggest.history_url_template.clone(),
            overflow_provider: settings.providers.overflow_shortcut.clone(),
            timer,
            events_tx,
            events_rx,
            updated_latest_result: false,
            delay_interval_has_passed: false,
            have_committed_during_this_query: false,
            done: true,
            query_in_progress: false,
        }
    }

    /// Handle for asynchronous providers to report updates through.
    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle {
            events: self.events_tx.clone(),
        }
    }

    pub fn add_provider(&mut self, provider: Box<dyn Provider>) {
        debug_assert!(!self.query_in_progress, "providers fixed once querying");
        self.providers.push(provider);
    }

    pub fn add_observer(&mut self, observer: Box<dyn SuggestionObserver>) {
        self.observers.push(observer);
    }

    pub fn done(&self) -> bool {
        self.done
    }

    pub fn input(&self) -> &SuggestionInput {
        &self.input
    }

    /// The last committed result.
    pub fn result(&self) -> &SuggestionList {
        &self.result
    }

    /// Begin a query over the typed text. Runs the synchronous pass over all
    /// providers before returning; asynchronous work continues via events.
    pub fn start(
        &mut self,
        text: &str,
        desired_tld: &str,
        prevent_inline_autocomplete: bool,
        prefer_keyword: bool,
        synchronous_only: bool,
    ) {
        let old_text = self.input.text().to_string();
        let old_synchronous_only = self.input.synchronous_only();
        self.input = SuggestionInput::with_policy(
            text,
            desired_tld,
            prevent_inline_autocomplete,
            prefer_keyword,
            synchronous_only,
            &self.policy,
        );

        // When only modifier state changed (ctrl toggling the desired TLD,
        // IME composition ending) providers can reuse their work. Compared
        // after input construction, which may strip a leading '?'.
        let minimal_changes = self.input.text() == old_text
            && self.input.synchronous_only() == old_synchronous_only;

        // Interrupting an old query: committing what we have is fine as long
        // as it doesn't shrink the visible set, and makes rapid typing feel
        // responsive. The edit is not updated; its contents already moved on.
        if !minimal_changes && !self.done && self.latest_result.len() >= self.result.len() {
            self.commit_result(false);
        }

        // A timer armed near the end of the old query would fire on this
        // one's half-merged results. Keep it only if the old query never
        // committed, so a fast typist still gets updates at interval pace.
        if self.have_committed_during_this_query {
            self.timer.stop();
            self.delay_interval_has_passed = false;
        }

        debug!(
            input_type = self.input.input_type().as_str(),
            minimal_changes,
            providers = self.providers.len(),
            "starting query for {:?}",
            self.input.text()
        );

        self.have_committed_during_this_query = false;
        self.query_in_progress = true;
        for provider in &mut self.providers {
            provider.start(&self.input, minimal_changes);
            if synchronous_only {
                debug_assert!(provider.done(), "provider ignored synchronous_only");
            }
        }
        self.check_if_done();
        self.update_latest_result(true);
    }

    /// Cancel the current query. With `clear_result`, observers see one
    /// final empty result so popups close.
    pub fn stop(&mut self, clear_result: bool) {
        for provider in &mut self.providers {
            provider.stop();
        }
        self.timer.stop();
        self.updated_latest_result = false;
        self.delay_interval_has_passed = false;
        self.done = true;
        self.query_in_progress = false;
        if clear_result && !self.result.is_empty() {
            self.result.reset();
            let result = &self.result;
            for observer in self.observers.iter_mut() {
                observer.on_result_changed(result);
            }
            // No default-match notification: this clears the popup without
            // touching the edit.
        }
        self.latest_result.copy_from(&self.result);
    }

    /// Remove a deletable match from its provider and recommit so the
    /// deletion is visible immediately.
    pub fn delete_match(&mut self, m: &SuggestionMatch) {
        debug_assert!(m.deletable, "delete_match on an undeletable match");
        match self
            .providers
            .iter_mut()
            .find(|p| p.name() == m.provider)
        {
            Some(provider) => provider.delete_match(m),
            None => {
                warn!("no provider {:?} for deleted match", m.provider);
                return;
            }
        }
        self.check_if_done();
        self.update_latest_result(false);
        self.commit_result(true);
    }

    /// Commit whatever is merged if this query has never committed. Edit
    /// views call this before acting on a result they can see.
    pub fn commit_if_never_committed(&mut self) {
        if !self.have_committed_during_this_query {
            self.commit_result(true);
        }
    }

    /// Process one event. Exposed so embedders can drive the controller
    /// from their own loop.
    pub fn handle_event(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::ProviderUpdate { matches_changed } => {
                self.on_provider_update(matches_changed)
            }
            ControllerEvent::DebounceElapsed(generation) => {
                if self.timer.acknowledge(generation) {
                    self.delay_interval_has_passed = true;
                    self.commit_result(true);
                }
            }
        }
    }

    /// Await the next event for this controller.
    pub async fn next_event(&mut self) -> Option<ControllerEvent> {
        self.events_rx.recv().await
    }

    /// Handle every event already in the channel, without waiting.
    pub fn pump_pending(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Drive events until the query is done and fully committed.
    pub async fn run_until_done(&mut self) {
        while !(self.done && !self.updated_latest_result) {
            match self.events_rx.recv().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }
    }

    fn on_provider_update(&mut self, matches_changed: bool) {
        if !self.query_in_progress {
            debug!("ignoring provider update outside a query");
            return;
        }
        self.check_if_done();
        if matches_changed || self.done {
            self.update_latest_result(false);
        }
    }

    /// Re-merge all provider matches into `latest_result` and decide
    /// whether to commit now.
    fn update_latest_result(&mut self, is_synchronous_pass: bool) {
        self.latest_result.reset();
        for provider in &self.providers {
            self.latest_result.append_matches(&provider.matches());
        }
        self.updated_latest_result = true;

        self.latest_result.sort_and_cull(&self.input, self.max_matches);
        self.ensure_fallback_match();
        self.add_overflow_shortcut();

        #[cfg(debug_assertions)]
        self.latest_result.validate();

        if is_synchronous_pass {
            if !self.timer.is_running() {
                self.timer.start();
            }
            let latest = &self.latest_result;
            for observer in self.observers.iter_mut() {
                observer.on_default_match_changed(latest);
            }
        }

        // With nothing visible, commit immediately so the first keystroke
        // answers instantly. A finished query that never committed also goes
        // out now. Otherwise wait out the debounce interval.
        if self.result.is_empty()
            || (self.done && !self.have_committed_during_this_query)
            || self.delay_interval_has_passed
        {
            self.commit_result(true);
        }
    }

    /// Publish `latest_result` to observers.
    fn commit_result(&mut self, notify_default_match: bool) {
        if self.done {
            self.timer.stop();
            self.delay_interval_has_passed = false;
        }

        // Nothing merged since the last commit means nothing to say.
        if !self.updated_latest_result {
            return;
        }
        self.updated_latest_result = false;
        self.delay_interval_has_passed = false;
        self.have_committed_during_this_query = true;
        self.result.copy_from(&self.latest_result);

        debug!(
            matches = self.result.len(),
            default = ?self.result.default_index(),
            "committing result"
        );
        let result = &self.result;
        for observer in self.observers.iter_mut() {
            observer.on_result_changed(result);
        }
        if notify_default_match {
            // Sent second: the popup updates its state on the result
            // notification before the edit reads the default match.
            for observer in self.observers.iter_mut() {
                observer.on_default_match_changed(result);
            }
        }
        if !self.done {
            self.timer.start();
        }
    }

    /// An empty merge for a live input still needs a default match: search
    /// for exactly what was typed.
    fn ensure_fallback_match(&mut self) {
        if !self.latest_result.is_empty() || self.input.input_type() == InputType::Invalid {
            return;
        }
        let text = self.input.text().to_string();
        let m = SuggestionMatch::new(
            "fallback",
            FALLBACK_RELEVANCE,
            false,
            MatchType::SearchWhatYouTyped,
        )
        .with_transition(NavigationKind::Generated)
        .with_destination(&fill_url_template(&self.search_url_template, &text))
        .with_contents(&text)
        .with_fill_into_edit(&text);
        self.latest_result.append_matches(&[m]);
        self.latest_result.sort_and_cull(&self.input, self.max_matches);
    }

    /// A done provider may hold matches culling pushed out. Put a single
    /// missing match back (resolving a sentinel relevance), or synthesize
    /// one shortcut row pointing at the full results page.
    fn add_overflow_shortcut(&mut self) {
        let Some(provider_name) = self.overflow_provider.clone() else {
            return;
        };
        let Some(provider) = self.providers.iter().find(|p| p.name() == provider_name)
        else {
            return;
        };
        if !provider.done() || self.latest_result.default_index().is_none() {
            return;
        }

        let shown: HashSet<String> = self
            .latest_result
            .iter()
            .map(|m| m.destination_url.clone())
            .collect();
        let provider_matches = provider.matches();
        let mut unshown: Vec<SuggestionMatch> = provider_matches
            .iter()
            .filter(|m| !shown.contains(&m.destination_url))
            .cloned()
            .collect();
        if unshown.is_empty() {
            return;
        }

        if unshown.len() == 1 {
            let mut m = unshown.remove(0);
            if m.relevance < 0 {
                m.relevance = -m.relevance;
            }
            self.latest_result.add_match(&m);
            return;
        }

        let text = self.input.text();
        let contents = format!(
            "See all {} matches in history for {}",
            provider_matches.len(),
            text
        );
        let mut m = SuggestionMatch::new(&provider_name, 0, false, MatchType::OpenHistoryPage)
            .with_transition(NavigationKind::AutoBookmark)
            .with_destination(&fill_url_template(&self.history_url_template, text))
            .with_fill_into_edit(text);
        m.contents_class = SuggestionMatch::classify_match_in_string(
            text,
            &contents,
            crate::results::style::NONE,
        );
        m.contents = contents;
        self.latest_result.add_match(&m);
    }

    fn check_if_done(&mut self) {
        self.done = self.providers.iter().all(|p| p.done());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{HistoryEntry, HistoryProvider};
    use std::sync::{Arc, Mutex};

    const RESULTS_PER_PROVIDER: usize = 3;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Notification {
        Result(usize),
        DefaultMatch(usize),
    }

    /// Observer that records every notification with the result size.
    struct RecordingObserver {
        log: Arc<Mutex<Vec<Notification>>>,
    }

    impl SuggestionObserver for RecordingObserver {
        fn on_result_changed(&mut self, result: &SuggestionList) {
            self.log.lock().unwrap().push(Notification::Result(result.len()));
        }

        fn on_default_match_changed(&mut self, result: &SuggestionList) {
            self.log
                .lock()
                .unwrap()
                .push(Notification::DefaultMatch(result.len()));
        }
    }

    struct TestProviderState {
        relevance: i32,
        prefix: String,
        matches: Vec<SuggestionMatch>,
        done: bool,
    }

    impl TestProviderState {
        fn add_results(&mut self, name: &str, start_at: usize, num: usize) {
            for i in start_at..num {
                let fill = format!("{}{}", self.prefix, i);
                let m = SuggestionMatch::new(
                    name,
                    self.relevance - i as i32,
                    false,
                    MatchType::UrlWhatYouTyped,
                )
                .with_destination(&fill)
                .with_contents(&fill)
                .with_description(&fill)
                .with_fill_into_edit(&fill);
                self.matches.push(m);
            }
        }
    }

    /// Provider yielding one synchronous match and the rest on demand, via
    /// `complete`.
    struct TestProvider {
        name: String,
        state: Arc<Mutex<TestProviderState>>,
    }

    impl TestProvider {
        fn new(name: &str, relevance: i32, prefix: &str) -> (Self, Arc<Mutex<TestProviderState>>) {
            let state = Arc::new(Mutex::new(TestProviderState {
                relevance,
                prefix: prefix.to_string(),
                matches: Vec::new(),
                done: true,
            }));
            (
                Self {
                    name: name.to_string(),
                    state: Arc::clone(&state),
                },
                state,
            )
        }

        fn complete(state: &Arc<Mutex<TestProviderState>>, name: &str) {
            let mut state = state.lock().unwrap();
            state.add_results(name, 1, RESULTS_PER_PROVIDER);
            state.done = true;
        }
    }

    impl Provider for TestProvider {
        fn name(&self) -> &str {
            &self.name
        }

        fn start(&mut self, input: &SuggestionInput, minimal_changes: bool) {
            if minimal_changes {
                return;
            }
            let mut state = self.state.lock().unwrap();
            state.matches.clear();
            let name = self.name.clone();
            state.add_results(&name, 0, 1);
            state.done = input.synchronous_only();
        }

        fn stop(&mut self) {
            self.state.lock().unwrap().done = true;
        }

        fn matches(&self) -> Vec<SuggestionMatch> {
            self.state.lock().unwrap().matches.clone()
        }

        fn done(&self) -> bool {
            self.state.lock().unwrap().done
        }
    }

    struct Harness {
        controller: SuggestionController,
        provider_a: Arc<Mutex<TestProviderState>>,
        provider_b: Arc<Mutex<TestProviderState>>,
        log: Arc<Mutex<Vec<Notification>>>,
    }

    fn harness_with(settings: &Settings, same_destinations: bool) -> Harness {
        let mut controller = SuggestionController::new(settings);
        let (pa, provider_a) =
            TestProvider::new("provider-a", RESULTS_PER_PROVIDER as i32, "http://a");
        let (pb, provider_b) = TestProvider::new(
            "provider-b",
            2 * RESULTS_PER_PROVIDER as i32,
            if same_destinations { "http://a" } else { "http://b" },
        );
        controller.add_provider(Box::new(pa));
        controller.add_provider(Box::new(pb));

        let log = Arc::new(Mutex::new(Vec::new()));
        controller.add_observer(Box::new(RecordingObserver {
            log: Arc::clone(&log),
        }));
        Harness {
            controller,
            provider_a,
            provider_b,
            log,
        }
    }

    fn harness(same_destinations: bool) -> Harness {
        harness_with(&Settings::default(), same_destinations)
    }

    impl Harness {
        /// Finish both providers' asynchronous halves and drain events.
        async fn run_query(&mut self, text: &str) {
            self.controller.start(text, "", true, false, false);
            let handle = self.controller.handle();
            TestProvider::complete(&self.provider_a, "provider-a");
            handle.on_provider_update(true);
            TestProvider::complete(&self.provider_b, "provider-b");
            handle.on_provider_update(true);
            self.controller.run_until_done().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_merges_both_providers() {
        let mut h = harness(false);
        h.run_query("a").await;

        let result = h.controller.result();
        assert_eq!(result.len(), 2 * RESULTS_PER_PROVIDER);
        // The default match is the highest-relevance match, which comes
        // from the second provider.
        assert_eq!(result.default_match().unwrap().provider, "provider-b");
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_duplicates() {
        let mut h = harness(true);
        h.run_query("a").await;

        // The first provider's matches were all eliminated by the second
        // provider's higher-relevance duplicates.
        let result = h.controller.result();
        assert_eq!(result.len(), RESULTS_PER_PROVIDER);
        for m in result.iter() {
            assert_eq!(m.provider, "provider-b");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_commit_is_instant() {
        let mut h = harness(false);
        h.controller.start("a", "", true, false, false);

        // With nothing visible the synchronous pass commits right away:
        // default-match preview first, then the commit pair.
        let log = h.log.lock().unwrap().clone();
        assert_eq!(
            log,
            vec![
                Notification::DefaultMatch(2),
                Notification::Result(2),
                Notification::DefaultMatch(2),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_holds_updates_until_interval() {
        let mut h = harness(false);
        h.controller.start("a", "", true, false, false);
        h.log.lock().unwrap().clear();

        // One provider finishes; its new matches merge but must not commit
        // before the debounce interval.
        TestProvider::complete(&h.provider_a, "provider-a");
        h.controller.handle().on_provider_update(true);
        h.controller.pump_pending();
        assert!(h.log.lock().unwrap().is_empty());
        assert_eq!(h.controller.result().len(), 2);

        // The timer fires (paused clock auto-advances) and the held merge
        // commits. Superseded timer intervals may deliver stale events
        // first; they are ignored.
        for _ in 0..4 {
            if !h.log.lock().unwrap().is_empty() {
                break;
            }
            let event = h.controller.next_event().await.unwrap();
            h.controller.handle_event(event);
        }
        let log = h.log.lock().unwrap().clone();
        assert_eq!(
            log,
            vec![Notification::Result(4), Notification::DefaultMatch(4)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_query_commits_without_waiting() {
        let mut h = harness(false);
        h.run_query("a").await;
        assert!(h.controller.done());
        // The final commit happened even though no debounce interval passed
        // after the last update.
        assert_eq!(h.controller.result().len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_synchronous_only_query() {
        let mut h = harness(false);
        h.controller.start("a", "", true, false, true);
        assert!(h.controller.done());
        // Only the synchronous matches exist and they are committed.
        assert_eq!(h.controller.result().len(), 2);
        h.controller.run_until_done().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupting_start_commits_pending_merge() {
        let mut h = harness(false);
        h.controller.start("a", "", true, false, false);

        // An uncommitted merge is waiting when the user types again.
        TestProvider::complete(&h.provider_a, "provider-a");
        h.controller.handle().on_provider_update(true);
        h.controller.pump_pending();
        h.log.lock().unwrap().clear();

        h.controller.start("ab", "", true, false, false);
        let log = h.log.lock().unwrap().clone();
        // The pending 4-match merge commits without a default-match
        // notification (the edit has already moved on), then the new
        // query's synchronous pass runs.
        assert_eq!(log[0], Notification::Result(4));
        assert_eq!(log[1], Notification::DefaultMatch(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_notifications_after_stop() {
        let mut h = harness(false);
        h.controller.start("a", "", true, false, false);
        h.controller.stop(false);
        h.log.lock().unwrap().clear();

        // A straggler provider callback arrives after the query stopped.
        TestProvider::complete(&h.provider_a, "provider-a");
        h.controller.handle().on_provider_update(true);
        h.controller.pump_pending();
        assert!(h.log.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_with_clear_notifies_once() {
        let mut h = harness(false);
        h.run_query("a").await;
        h.log.lock().unwrap().clear();

        h.controller.stop(true);
        let log = h.log.lock().unwrap().clone();
        // One result notification with the emptied list, and no
        // default-match notification.
        assert_eq!(log, vec![Notification::Result(0)]);
        assert!(h.controller.result().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_if_never_committed() {
        let mut h = harness(false);
        h.run_query("a").await;
        h.log.lock().unwrap().clear();

        // A follow-up query whose synchronous pass doesn't commit (results
        // are visible, providers still running, interval not passed).
        h.controller.start("ab", "", true, false, false);
        let before = h.log.lock().unwrap().clone();
        assert!(!before.contains(&Notification::Result(2)));

        h.controller.commit_if_never_committed();
        let log = h.log.lock().unwrap().clone();
        assert_eq!(*log.last().unwrap(), Notification::DefaultMatch(2));
        assert_eq!(h.controller.result().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_match_for_empty_merge() {
        // No providers at all: the controller still produces a default.
        let mut controller = SuggestionController::new(&Settings::default());
        let log = Arc::new(Mutex::new(Vec::new()));
        controller.add_observer(Box::new(RecordingObserver {
            log: Arc::clone(&log),
        }));

        controller.start("?find me", "", false, false, false);
        controller.run_until_done().await;

        let result = controller.result();
        assert_eq!(result.len(), 1);
        let default_match = result.default_match().unwrap();
        assert_eq!(default_match.match_type, MatchType::SearchWhatYouTyped);
        assert_eq!(
            default_match.destination_url,
            "https://duckduckgo.com/?q=find%20me"
        );
        assert_eq!(default_match.contents, "find me");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_fallback_for_invalid_input() {
        let mut controller = SuggestionController::new(&Settings::default());
        controller.start("   ", "", false, false, false);
        controller.run_until_done().await;
        assert!(controller.result().is_empty());
    }

    fn history_settings(max_matches: usize) -> Settings {
        let mut settings = Settings::default();
        settings.limits.max_matches = max_matches;
        settings.providers.overflow_shortcut = Some("history".to_string());
        settings
    }

    fn seeded_history() -> HistoryProvider {
        HistoryProvider::new(3).with_entries(vec![
            HistoryEntry::new("http://wiki-a.org/", "Wiki A", 9, 5),
            HistoryEntry::new("http://wiki-b.org/", "Wiki B", 5, 2),
            HistoryEntry::new("http://wiki-c.org/", "Wiki C", 1, 0),
        ])
    }

    #[tokio::test(start_paused = true)]
    async fn test_overflow_single_match_added_directly() {
        // Room for two of the three history matches; the one pushed out
        // comes back directly rather than as a shortcut row.
        let mut controller = SuggestionController::new(&history_settings(2));
        controller.add_provider(Box::new(seeded_history()));
        controller.start("wiki", "", false, false, false);
        controller.run_until_done().await;

        let result = controller.result();
        assert_eq!(result.len(), 3);
        assert!(result
            .iter()
            .any(|m| m.destination_url == "http://wiki-c.org/"));
        assert!(result.iter().all(|m| m.match_type != MatchType::OpenHistoryPage));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overflow_many_matches_get_shortcut_row() {
        let mut controller = SuggestionController::new(&history_settings(1));
        controller.add_provider(Box::new(seeded_history()));
        controller.start("wiki", "", false, false, false);
        controller.run_until_done().await;

        let result = controller.result();
        assert_eq!(result.len(), 2);
        let shortcut = result
            .iter()
            .find(|m| m.match_type == MatchType::OpenHistoryPage)
            .unwrap();
        assert_eq!(shortcut.destination_url, "about:history?q=wiki");
        assert!(shortcut.contents.contains("3 matches"));
        // The shortcut never displaces the default match.
        assert_eq!(result.default_match().unwrap().match_type, MatchType::HistoryUrl);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_match_recommits() {
        let mut controller = SuggestionController::new(&Settings::default());
        controller.add_provider(Box::new(seeded_history()));
        let log = Arc::new(Mutex::new(Vec::new()));
        controller.add_observer(Box::new(RecordingObserver {
            log: Arc::clone(&log),
        }));

        controller.start("wiki", "", false, false, false);
        controller.run_until_done().await;
        let victim = controller.result().get(0).unwrap().clone();
        assert!(victim.deletable);
        log.lock().unwrap().clear();

        controller.delete_match(&victim);
        let result = controller.result();
        assert!(result
            .iter()
            .all(|m| m.destination_url != victim.destination_url));
        // The deletion committed immediately, default match included.
        let recorded = log.lock().unwrap().clone();
        assert_eq!(recorded.len(), 2);
        assert!(matches!(recorded[1], Notification::DefaultMatch(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_minimal_changes_restart() {
        let mut h = harness(false);
        h.run_query("a").await;
        let before = h.controller.result().len();

        // Same text again: providers keep their matches and the result is
        // unchanged.
        h.controller.start("a", "", true, false, false);
        h.controller.run_until_done().await;
        assert_eq!(h.controller.result().len(), before);
    }
}
