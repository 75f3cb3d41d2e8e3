use std::fmt;
use std::str::FromStr;

use tracing::warn;

const POST_TYPE: &str = "wp-manga";
const POST_STATUS: &str = "publish";
const ITEM_LAYOUT: &str = "big_thumbnail";
const VARS_TEMPLATE: &str = "search";

const LATEST_UPDATE_KEY: &str = "_latest_update";
const WEEK_VIEWS_KEY: &str = "_wp_manga_week_views_value";
const ALL_VIEWS_KEY: &str = "_wp_manga_views";
const AVERAGE_REVIEWS_KEY: &str = "_manga_avarage_reviews";
const TOTAL_VOTES_KEY: &str = "_manga_total_votes";

// Named sub-query aliases; the misspelling is the endpoint's own.
const AVERAGE_REVIEWS_ALIAS: &str = "query_avarage_reviews";
const TOTAL_REVIEWS_ALIAS: &str = "query_total_reviews";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchMode {
    New,
    #[default]
    Latest,
    Trending,
    MostViewed,
    Rating,
    AZ,
    Relevance,
}

impl SearchMode {
    pub const ALL: [SearchMode; 7] = [
        SearchMode::New,
        SearchMode::Latest,
        SearchMode::Trending,
        SearchMode::MostViewed,
        SearchMode::Rating,
        SearchMode::AZ,
        SearchMode::Relevance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::New => "new",
            SearchMode::Latest => "latest",
            SearchMode::Trending => "trending",
            SearchMode::MostViewed => "most_viewed",
            SearchMode::Rating => "rating",
            SearchMode::AZ => "a_z",
            SearchMode::Relevance => "relevance",
        }
    }

    /// Resolve a mode name, falling back to [`SearchMode::Latest`] for
    /// anything unrecognized. The endpoint tolerates unknown sort keys, so
    /// neither do we reject them.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|e: UnknownMode| {
            warn!(error = %e, "Falling back to latest");
            SearchMode::default()
        })
    }
}

impl FromStr for SearchMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim())
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown search mode: {}", self.0)
    }
}

impl std::error::Error for UnknownMode {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    // `order` is lower-case `desc` in the base set, `ASC` when a_z overrides it.
    fn as_order_value(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "desc",
        }
    }

    fn as_ranking_value(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderBy {
    /// A single WordPress `orderby` value such as `date` or `meta_value_num`.
    Field(&'static str),
    /// Ordered list of named sub-query aliases, each with its own direction.
    Ranked(Vec<(&'static str, Direction)>),
}

/// One entry of the `meta_query` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaClause {
    Relation(&'static str),
    /// Named sub-queries that only require the meta key to exist.
    Exists(Vec<(&'static str, &'static str)>),
}

/// Resolved parameter set for one `madara_load_more` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    term: String,
    page: u32,
    order_by: OrderBy,
    meta_key: &'static str,
    order: Direction,
    meta_query: Vec<MetaClause>,
}

impl QuerySpec {
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Serialize as PHP-style bracketed form keys nested under `prefix`,
    /// in the order the endpoint has always received them.
    pub fn form_pairs(&self, prefix: &str) -> Vec<(String, String)> {
        let key = |path: &str| format!("{prefix}[{path}]");
        let mut pairs = vec![(key("s"), self.term.clone())];

        match &self.order_by {
            OrderBy::Field(field) => pairs.push((key("orderby"), (*field).to_string())),
            OrderBy::Ranked(ranking) => {
                for (i, (alias, direction)) in ranking.iter().enumerate() {
                    pairs.push((
                        key(&format!("orderby][{i}][{alias}")),
                        direction.as_ranking_value().to_string(),
                    ));
                }
            }
        }

        pairs.push((key("paged"), self.page.to_string()));
        pairs.push((key("template"), VARS_TEMPLATE.to_string()));

        for (i, clause) in self.meta_query.iter().enumerate() {
            match clause {
                MetaClause::Relation(relation) => pairs.push((
                    key(&format!("meta_query][{i}][relation")),
                    (*relation).to_string(),
                )),
                MetaClause::Exists(named) => {
                    for (alias, meta_key) in named {
                        pairs.push((
                            key(&format!("meta_query][{i}][{alias}][key")),
                            (*meta_key).to_string(),
                        ));
                    }
                }
            }
        }

        pairs.push((key("post_type"), POST_TYPE.to_string()));
        pairs.push((key("post_status"), POST_STATUS.to_string()));
        pairs.push((key("meta_key"), self.meta_key.to_string()));
        pairs.push((key("order"), self.order.as_order_value().to_string()));
        pairs.push((key("manga_archives_item_layout"), ITEM_LAYOUT.to_string()));
        pairs
    }
}

/// Build the query parameters for `page` of a `mode` search on `query`.
pub fn plan(page: u32, query: &str, mode: SearchMode) -> QuerySpec {
    let mut order_by = OrderBy::Field("meta_value_num");
    let mut meta_key = LATEST_UPDATE_KEY;
    let mut order = Direction::Desc;
    let mut meta_query = vec![MetaClause::Relation("AND")];

    match mode {
        SearchMode::New => order_by = OrderBy::Field("date"),
        SearchMode::Latest | SearchMode::Relevance => {}
        SearchMode::Trending => meta_key = WEEK_VIEWS_KEY,
        SearchMode::MostViewed => meta_key = ALL_VIEWS_KEY,
        SearchMode::Rating => {
            order_by = OrderBy::Ranked(vec![
                (AVERAGE_REVIEWS_ALIAS, Direction::Desc),
                (TOTAL_REVIEWS_ALIAS, Direction::Desc),
            ]);
            meta_query.push(MetaClause::Exists(vec![
                (AVERAGE_REVIEWS_ALIAS, AVERAGE_REVIEWS_KEY),
                (TOTAL_REVIEWS_ALIAS, TOTAL_VOTES_KEY),
            ]));
        }
        SearchMode::AZ => {
            order_by = OrderBy::Field("post_title");
            order = Direction::Asc;
        }
    }

    QuerySpec {
        term: query.to_string(),
        page,
        order_by,
        meta_key,
        order,
        meta_query,
    }
}
