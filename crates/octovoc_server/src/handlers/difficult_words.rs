//! /student/difficult-words
//! Handlers for a student's difficult words.

use super::prelude::*;
use crate::error::RequestError;
use octovoc_core::{DifficultWord, Word, WordId};

// handlers

/// Lists the student's difficult words, oldest first.
#[instrument]
pub async fn get_all(
    State(state): State<OctovocState>,
    user: Authentication,
) -> OctovocResult<Json<Vec<DifficultWord>>> {
    use schema::{difficult_words as dw, modules as m, words as w};

    let difficult_words = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        let difficult_words = dw::table
            .inner_join(w::table.inner_join(m::table))
            .filter(dw::user_id.eq(user.user_id))
            .order_by((dw::added_at, dw::id))
            .select(DifficultWordQuery::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(DifficultWord::from)
            .collect::<Vec<_>>();
        EyreResult::Ok(difficult_words)
    })
    .await??;

    Ok(Json(difficult_words))
}

/// Removes a word from the student's difficult words.
#[instrument]
pub async fn delete(
    State(state): State<OctovocState>,
    user: Authentication,
    Path(word_id): Path<WordId>,
) -> OctovocResult<()> {
    use schema::difficult_words as dw;

    tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        let user_id = user.user_id;
        let deleted = diesel::delete(dw::table)
            .filter(eq!(dw, user_id).and(eq!(dw, word_id)))
            .execute(&mut conn)?;
        if deleted == 0 {
            return EyreResult::Err(RequestError::NotFound("Difficult word").into());
        }
        tracing::info!("word {word_id} removed from difficult words");
        EyreResult::Ok(())
    })
    .await??;

    Ok(())
}

// queries

query! {
    struct DifficultWordQuery {
        id: i32 = difficult_words::id,
        word_id: i32 = words::id,
        word: String = words::word,
        meaning: String = words::meaning,
        example_sentence: String = words::example_sentence,
        case_sensitive: bool = modules::case_sensitive,
        module_id: i32 = words::module_id,
        position_in_module: i32 = words::position_in_module,
    }
}

impl From<DifficultWordQuery> for DifficultWord {
    fn from(row: DifficultWordQuery) -> Self {
        Self {
            id: row.id,
            word_id: row.word_id,
            word: Word {
                id: row.word_id,
                word: row.word,
                meaning: row.meaning,
                example_sentence: row.example_sentence,
                case_sensitive: row.case_sensitive,
                module_id: Some(row.module_id),
                position_in_module: Some(row.position_in_module),
            },
        }
    }
}
