//! Functions related to the quotes and videos shown after completing a module.

use crate::utils::diesel::query;
use diesel::prelude::*;
use octovoc_api::response as res;
use rand::seq::IndexedRandom;

/// Picks one of the active quotes at random.
pub fn random_quote(conn: &mut PgConnection) -> eyre::Result<Option<res::Quote>> {
    use crate::schema::quotes as q;

    let quotes = q::table
        .filter(q::is_active.eq(true))
        .select(QuoteQuery::as_select())
        .load(conn)?;
    Ok(pick(quotes, &mut rand::rng()))
}

fn pick<R: rand::Rng + ?Sized>(quotes: Vec<QuoteQuery>, rng: &mut R) -> Option<res::Quote> {
    let quote = quotes.choose(rng)?;
    Some(res::Quote {
        id: quote.id,
        text: quote.text.clone(),
        author: quote.author.clone(),
        video_url: quote.video_url.clone(),
    })
}

// queries

query! {
    #[derive(Debug)]
    struct QuoteQuery {
        id: i32 = quotes::id,
        text: String = quotes::text,
        author: Option<String> = quotes::author,
        video_url: Option<String> = quotes::video_url,
    }
}
