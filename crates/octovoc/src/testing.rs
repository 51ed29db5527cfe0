//! In-memory API fakes.

use crate::api::{ApiError, ApiResult, ContentApi, ProgressApi, RewardApi};
use octovoc_api::response::{self as res, Utc};
use octovoc_core::{BatteryId, DifficultWord, ModuleId, Phase, Word, WordId};
use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
};

/// Shows engine logs in the output of failing tests.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn word(id: WordId) -> Word {
    Word {
        id,
        word: format!("woord{id}"),
        meaning: format!("betekenis {id}"),
        example_sentence: format!("Dit is *woord{id}* in een zin."),
        case_sensitive: false,
        module_id: Some(1),
        position_in_module: Some(id),
    }
}

pub fn words(ids: impl IntoIterator<Item = WordId>) -> Vec<Word> {
    ids.into_iter().map(word).collect()
}

pub fn difficult(id: i32, word_id: WordId) -> DifficultWord {
    DifficultWord {
        id,
        word_id,
        word: word(word_id),
    }
}

pub fn quote() -> res::Quote {
    res::Quote {
        id: 1,
        text: "Oefening baart kunst.".to_string(),
        author: None,
        video_url: None,
    }
}

pub fn module_progress(
    module_id: ModuleId,
    current_battery_id: Option<BatteryId>,
    in_final_round: bool,
) -> res::ModuleProgress {
    res::ModuleProgress {
        id: 1,
        module_id,
        current_battery_id,
        battery_order: vec![],
        completed_batteries: vec![],
        in_final_round,
        final_round_word_ids: vec![],
        is_completed: false,
        completion_date: None,
        started_at: Utc::now(),
    }
}

pub fn battery_progress(battery_id: BatteryId, phase: Phase, queue: Vec<WordId>) -> res::BatteryProgress {
    res::BatteryProgress {
        id: 100 + battery_id,
        battery_id,
        current_phase: phase,
        current_question_queue: queue,
        phase1_completed: phase > Phase::Recognition,
        phase2_completed: phase > Phase::CuedRecall,
        phase3_completed: false,
        is_completed: false,
        completed_at: None,
    }
}

pub fn battery_start(battery_id: BatteryId, phase: Phase, queue: Vec<WordId>) -> res::BatteryStart {
    let battery_words = words(queue.iter().copied());
    res::BatteryStart {
        current_word: battery_words.first().cloned(),
        battery_progress: battery_progress(battery_id, phase, queue),
        battery_words,
    }
}

pub fn next_word(correct: bool, progress: res::BatteryProgress) -> res::AnswerResult {
    res::AnswerResult {
        is_correct: correct,
        correct_answer: "woord1".to_string(),
        next_word: progress.current_question_queue.first().copied().map(word),
        battery_progress: Some(progress),
        phase_complete: false,
        battery_complete: false,
    }
}

#[derive(Debug, Default)]
pub struct FakeContent {
    pub modules: HashMap<ModuleId, res::ModuleOutline>,
    pub batteries: HashMap<BatteryId, res::BatteryContent>,
    pub quote: Option<res::Quote>,
    pub outline_requests: RefCell<usize>,
    pub level_requests: RefCell<Vec<Option<i32>>>,
}

impl FakeContent {
    /// A free module with the given batteries in order.
    pub fn module(module_id: ModuleId, batteries: &[(BatteryId, &[WordId])]) -> Self {
        let outline = res::ModuleOutline {
            id: module_id,
            name: "Module".to_string(),
            is_free: true,
            battery_order: batteries.iter().map(|(id, _)| *id).collect(),
        };
        let batteries = batteries
            .iter()
            .map(|(id, word_ids)| {
                let content = res::BatteryContent {
                    id: *id,
                    module_id,
                    words: words(word_ids.iter().copied()),
                };
                (*id, content)
            })
            .collect();
        Self {
            modules: HashMap::from([(module_id, outline)]),
            batteries,
            quote: Some(quote()),
            outline_requests: RefCell::new(0),
            level_requests: RefCell::new(Vec::new()),
        }
    }
}

impl ContentApi for &FakeContent {
    async fn modules(&self, level: Option<i32>) -> ApiResult<Vec<res::ModuleSummary>> {
        self.level_requests.borrow_mut().push(level);
        let modules = self
            .modules
            .values()
            .map(|outline| res::ModuleSummary {
                id: outline.id,
                name: outline.name.clone(),
                level: level.unwrap_or(1),
                is_free: outline.is_free,
                progress: None,
                completion_percentage: None,
            })
            .collect();
        Ok(modules)
    }

    async fn module_outline(&self, module_id: ModuleId) -> ApiResult<res::ModuleOutline> {
        *self.outline_requests.borrow_mut() += 1;
        self.modules
            .get(&module_id)
            .cloned()
            .ok_or_else(|| ApiError::with_status(404, "Module not found"))
    }

    async fn battery(&self, battery_id: BatteryId) -> ApiResult<res::BatteryContent> {
        self.batteries
            .get(&battery_id)
            .cloned()
            .ok_or_else(|| ApiError::with_status(404, "Battery not found"))
    }
}

impl RewardApi for &FakeContent {
    async fn random_quote(&self) -> ApiResult<Option<res::Quote>> {
        Ok(self.quote.clone())
    }
}

type Script<T> = RefCell<VecDeque<ApiResult<T>>>;

/// Answers every call with the next scripted response.
#[derive(Debug, Default)]
pub struct ScriptedProgress {
    pub module_starts: Script<res::ModuleProgress>,
    pub battery_starts: Script<res::BatteryStart>,
    pub answers: Script<res::AnswerResult>,
    pub final_round_starts: Script<res::FinalRoundStart>,
    pub final_round_answers: Script<res::FinalRoundResult>,
    pub completions: Script<res::ModuleCompletion>,
    pub difficult_words: RefCell<Vec<DifficultWord>>,
    pub fail_removals: RefCell<bool>,
    pub removed: RefCell<Vec<WordId>>,
    pub submitted: RefCell<Vec<(i32, WordId, String, Phase)>>,
    pub final_round_submitted: RefCell<Vec<(WordId, String)>>,
}

impl ScriptedProgress {
    pub fn script<T>(script: &Script<T>, response: ApiResult<T>) {
        script.borrow_mut().push_back(response);
    }

    pub fn completion(&self, module_id: ModuleId) {
        let mut progress = module_progress(module_id, None, false);
        progress.is_completed = true;
        Self::script(
            &self.completions,
            Ok(res::ModuleCompletion {
                quote: Some(quote()),
                progress,
            }),
        );
    }
}

fn next<T>(script: &Script<T>, call: &str) -> ApiResult<T> {
    script
        .borrow_mut()
        .pop_front()
        .unwrap_or_else(|| Err(ApiError::new(format!("Nothing scripted for {call}"))))
}

impl ProgressApi for &ScriptedProgress {
    async fn start_module(&self, _module_id: ModuleId) -> ApiResult<res::ModuleProgress> {
        next(&self.module_starts, "start_module")
    }

    async fn start_battery(&self, _battery_id: BatteryId) -> ApiResult<res::BatteryStart> {
        next(&self.battery_starts, "start_battery")
    }

    async fn answer_question(
        &self,
        battery_progress_id: i32,
        word_id: WordId,
        answer: &str,
        phase: Phase,
    ) -> ApiResult<res::AnswerResult> {
        self.submitted
            .borrow_mut()
            .push((battery_progress_id, word_id, answer.to_string(), phase));
        next(&self.answers, "answer_question")
    }

    async fn start_final_round(&self, _module_id: ModuleId) -> ApiResult<res::FinalRoundStart> {
        next(&self.final_round_starts, "start_final_round")
    }

    async fn answer_final_round(
        &self,
        _module_id: ModuleId,
        word_id: WordId,
        answer: &str,
    ) -> ApiResult<res::FinalRoundResult> {
        self.final_round_submitted
            .borrow_mut()
            .push((word_id, answer.to_string()));
        next(&self.final_round_answers, "answer_final_round")
    }

    async fn complete_module(&self, _module_id: ModuleId) -> ApiResult<res::ModuleCompletion> {
        next(&self.completions, "complete_module")
    }

    async fn difficult_words(&self) -> ApiResult<Vec<DifficultWord>> {
        Ok(self.difficult_words.borrow().clone())
    }

    async fn remove_difficult_word(&self, word_id: WordId) -> ApiResult<()> {
        if *self.fail_removals.borrow() {
            return Err(ApiError::with_status(500, "Internal server error"));
        }
        self.removed.borrow_mut().push(word_id);
        self.difficult_words
            .borrow_mut()
            .retain(|w| w.word_id != word_id);
        Ok(())
    }
}
