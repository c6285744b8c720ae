//! Extraction of rating fields from the `atcoder.jp/users/<handle>` page.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static USERNAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.username > span").expect("valid selector"));
static TABLE_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.dl-table tr").expect("valid selector"));
static TH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").expect("valid selector"));
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("valid selector"));
static SPAN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span").expect("valid selector"));

/// Fields read off a profile page. Unrated users have no `Rank`/`Rating` rows.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct ProfilePage {
    pub username: Option<String>,
    pub rating: Option<i64>,
    pub rank: Option<String>,
}

pub(super) fn parse_profile_page(html: &str) -> ProfilePage {
    let document = Html::parse_document(html);

    let username = document
        .select(&USERNAME)
        .next()
        .map(|span| collect_text(&span))
        .filter(|name| !name.is_empty());

    let mut page = ProfilePage {
        username,
        ..ProfilePage::default()
    };

    for row in document.select(&TABLE_ROW) {
        let (Some(th), Some(td)) = (row.select(&TH).next(), row.select(&TD).next()) else {
            continue;
        };
        match collect_text(&th).as_str() {
            // The Japanese page labels the rank row 順位.
            "Rank" | "順位" => {
                page.rank = Some(collect_text(&td)).filter(|rank| !rank.is_empty());
            }
            "Rating" => {
                // The rating sits in a colored span, followed by provisional markers.
                let value = td
                    .select(&SPAN)
                    .next()
                    .map_or_else(|| collect_text(&td), |span| collect_text(&span));
                page.rating = value.parse::<i64>().ok();
            }
            _ => {}
        }
    }

    if page.username.is_none() {
        tracing::warn!("failed to extract username from atcoder profile page");
    }

    page
}

fn collect_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}
