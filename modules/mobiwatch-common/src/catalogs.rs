//! Compile-time catalogs: the weighted term sets, aggregator sites, event
//! queries, and watched pages that queries are derived from. Immutable value
//! objects handed to the scheduler at construction, never ambient globals.

use crate::types::{SiteTarget, Term};

/// The term catalogs and query sources for one deployment.
#[derive(Debug, Clone)]
pub struct Catalogs {
    /// What we are looking for. First matching topic resolves a query's
    /// topic weight.
    pub topics: Vec<Term>,
    /// What is happening to it (tender, call for proposals, ...).
    pub actions: Vec<Term>,
    /// Literal time-boxed queries, added and removed by hand for temporary
    /// events. No topic/action decomposition.
    pub event_queries: Vec<String>,
    /// Procurement aggregators reached via domain-scoped search.
    pub sites: Vec<SiteTarget>,
}

impl Catalogs {
    /// The shared-mobility deployment: share cycles, e-scooters and
    /// micro-mobility procurement across the monitored regions.
    pub fn builtin() -> Self {
        Self {
            topics: vec![
                Term::new("シェアサイクル", 10),
                Term::new("自転車シェアリング", 8),
                Term::new("コミュニティサイクル", 7),
                Term::new("サイクルポート", 6),
                Term::new("シェアリング自転車", 5),
                Term::new("電動キックボード", 8),
                Term::new("特定小型原動機付自転車", 6),
                Term::new("マイクロモビリティ", 7),
            ],
            actions: vec![
                Term::new("公募", 10),
                Term::new("入札", 9),
                Term::new("募集", 8),
                Term::new("事業者", 8),
                Term::new("プロポーザル", 7),
                Term::new("企画提案", 7),
                Term::new("事業者選定", 7),
                Term::new("協定", 5),
                Term::new("連携", 5),
                Term::new("スポンサー", 4),
                Term::new("実証実験", 6),
                Term::new("用地", 4),
            ],
            event_queries: vec![
                "横浜万博 シェアサイクル".to_string(),
                "EXPO2027 シェアサイクル".to_string(),
                "園芸博 シェアサイクル".to_string(),
                "横浜万博 電動キックボード".to_string(),
            ],
            sites: vec![
                SiteTarget::new("njss", "njss.info"),
                SiteTarget::new("nyusatsu-king", "nyusatsu-king.com"),
            ],
        }
    }
}

/// Short keyword probes for the procurement portal API. The portal matches
/// notice titles, so these are broader than the search topics.
pub fn procurement_probes() -> Vec<&'static str> {
    vec!["自転車", "シェアサイクル", "サイクル", "サイクルポート"]
}

/// Prefecture codes the procurement portal queries are scoped to.
pub fn target_lg_codes() -> Vec<&'static str> {
    vec![
        // Kanto
        "08", // Ibaraki
        "09", // Tochigi
        "10", // Gunma
        "11", // Saitama
        "12", // Chiba
        "13", // Tokyo
        "14", // Kanagawa
        // Okinawa
        "47",
    ]
}

/// Region names matched against titles, snippets and URLs to tag records
/// with a prefecture.
pub fn target_prefectures() -> Vec<&'static str> {
    vec![
        "東京", "神奈川", "埼玉", "千葉", "茨城", "栃木", "群馬", "沖縄", "那覇", "石垣",
    ]
}

/// Keywords every watched page is matched against. Individual pages add
/// their own on top.
pub fn common_keywords() -> Vec<&'static str> {
    vec![
        "シェアサイクル",
        "電動キックボード",
        "特定小型原動機付自転車",
        "特定小型原付",
        "マイクロモビリティ",
        "公募",
        "募集",
        "事業者",
        "プロポーザル",
        "自転車シェアリング",
        "コミュニティサイクル",
        "サイクルポート",
    ]
}

/// A page watched directly, outside the search quota. Matched against
/// `common_keywords()` plus its own extras.
#[derive(Debug, Clone)]
pub struct WatchPage {
    pub url: &'static str,
    pub prefecture: &'static str,
    pub organization: &'static str,
    pub extra_keywords: Vec<&'static str>,
}

impl WatchPage {
    fn new(url: &'static str, prefecture: &'static str, organization: &'static str) -> Self {
        Self {
            url,
            prefecture,
            organization,
            extra_keywords: Vec::new(),
        }
    }

    fn with_extras(mut self, extras: Vec<&'static str>) -> Self {
        self.extra_keywords = extras;
        self
    }

    /// Full keyword list for this page.
    pub fn keywords(&self) -> Vec<&'static str> {
        let mut all = common_keywords();
        all.extend(self.extra_keywords.iter().copied());
        all
    }
}

/// Municipal procurement pages, metropolitan bureau pages and operator
/// newsrooms watched on every run.
pub fn watch_pages() -> Vec<WatchPage> {
    vec![
        // Tokyo wards: proposal/tender listings
        WatchPage::new(
            "https://www.city.chiyoda.lg.jp/koho/kuse/nyusatsu/proposal/index.html",
            "東京",
            "千代田区",
        ),
        WatchPage::new(
            "https://www.city.chuo.lg.jp/kusei/keiyakunyusatsu/propo/index.html",
            "東京",
            "中央区",
        ),
        WatchPage::new(
            "https://www.city.minato.tokyo.jp/keiyaku/kuse/nyusatsu/keyaku/proposal.html",
            "東京",
            "港区",
        ),
        WatchPage::new(
            "https://www.city.shinjuku.lg.jp/jigyo/index02_pps.html",
            "東京",
            "新宿区",
        ),
        WatchPage::new(
            "https://www.city.sumida.lg.jp/kurashi/jitensha/bicycle/share_cycle.html",
            "東京",
            "墨田区",
        ),
        WatchPage::new(
            "https://www.city.shibuya.tokyo.jp/jigyosha/proposal/proposal/",
            "東京",
            "渋谷区",
        ),
        WatchPage::new(
            "https://www.city.setagaya.lg.jp/mokuji/kusei/002/003/index.html",
            "東京",
            "世田谷区",
        ),
        WatchPage::new(
            "https://www.city.nerima.tokyo.jp/jigyoshamuke/jigyosha/oshirase/index.html",
            "東京",
            "練馬区",
        ),
        WatchPage::new(
            "https://www.city.adachi.tokyo.jp/shigoto/nyusatsu/jigyosha/proposal/index.html",
            "東京",
            "足立区",
        ),
        WatchPage::new(
            "https://www.city.edogawa.tokyo.jp/shigotosangyo/proposal/index.html",
            "東京",
            "江戸川区",
        ),
        // Tokyo metropolitan bureaus
        WatchPage::new(
            "https://www.kankyo.metro.tokyo.lg.jp/vehicle/management/bycicle_sharing/index.html",
            "東京",
            "東京都環境局",
        ),
        WatchPage::new(
            "https://www.metro.tokyo.lg.jp/purpose/opencall",
            "東京",
            "東京都",
        ),
        WatchPage::new(
            "https://www.tokyobayesg.metro.tokyo.lg.jp/priorityprojects/recruitment2024.html",
            "東京",
            "東京ベイeSGプロジェクト",
        )
        .with_extras(vec!["実証実験", "モビリティ"]),
        WatchPage::new(
            "https://www.kouwan.metro.tokyo.lg.jp/rinkai/youkou/index.html",
            "東京",
            "東京都港湾局",
        ),
        // Okinawa
        WatchPage::new(
            "https://www.pref.okinawa.jp/shigoto/nyusatsukeiyaku/1015342/index.html",
            "沖縄",
            "沖縄県",
        ),
        WatchPage::new(
            "https://www.city.naha.okinawa.jp/category/bosyu/index.html",
            "沖縄",
            "那覇市",
        ),
        WatchPage::new(
            "https://www.city.ishigaki.okinawa.jp/soshiki/keiyaku_kanzai/2/index.html",
            "沖縄",
            "石垣市",
        ),
        // Expo association
        WatchPage::new(
            "https://www.expo2027yokohama.or.jp/news/",
            "神奈川",
            "横浜万博協会",
        )
        .with_extras(vec!["万博", "モビリティ"]),
        // Designated cities
        WatchPage::new(
            "https://www.city.yokohama.lg.jp/business/nyusatsu/keiyaku/proposal/",
            "神奈川",
            "横浜市",
        ),
        WatchPage::new(
            "https://www.city.saitama.lg.jp/jigyosha/nyusatsu/proposal/index.html",
            "埼玉",
            "さいたま市",
        ),
        WatchPage::new(
            "https://www.city.chiba.jp/zaiseikyoku/zaisei/keiyaku/proposal.html",
            "千葉",
            "千葉市",
        ),
        // Operator newsrooms: partnership and expansion announcements
        WatchPage::new("https://www.d-bikeshare.com/news/", "", "ドコモ・バイクシェア")
            .with_extras(vec!["連携", "協定", "新規"]),
        WatchPage::new("https://www.hellocycling.jp/news/", "", "HELLO CYCLING")
            .with_extras(vec!["連携", "協定", "新規"]),
        WatchPage::new("https://luup.sc/news/", "", "Luup")
            .with_extras(vec!["連携", "協定", "新規"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalogs_are_disjoint_and_nonempty() {
        let catalogs = Catalogs::builtin();
        assert!(!catalogs.topics.is_empty());
        assert!(!catalogs.actions.is_empty());
        for topic in &catalogs.topics {
            assert!(
                !catalogs.actions.iter().any(|a| a.text == topic.text),
                "topic {} also appears as an action",
                topic.text
            );
        }
    }

    #[test]
    fn watch_page_keywords_include_extras() {
        let page = WatchPage::new("https://example.com", "", "org")
            .with_extras(vec!["万博"]);
        let keywords = page.keywords();
        assert!(keywords.contains(&"シェアサイクル"));
        assert!(keywords.contains(&"万博"));
    }
}
