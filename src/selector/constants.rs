//! 选择器常量

use std::time::Duration;

/// 指代韩国的关键词（统一小写）
pub const KOREA_KEYWORDS: &[&str] = &[
    // 한글
    "대한민국",
    "한국",
    "남한",
    "코리아",
    "서울",
    "daehanminguk",
    // 영문
    "south korea",
    "korea",
    "republic of korea",
    "rok",
    "kr",
    "kor",
    "korea, republic of",
    "korea (south)",
    "korea, south",
    "s. korea",
    "so. korea",
    "south korean",
    "k-country",
    "k.r",
    "rep. of korea",
    "south of korea",
    "korea (s)",
    "the land of the morning calm",
    // ISO 코드 및 기타
    "410",
    "+82",
    // 다른 언어
    "韓国",
    "韩国",
    "corée du sud",
    "südkorea",
    "corea del sur",
    "coreia do sul",
    "zuid-korea",
    "южная корея",
    "كوريا الجنوبية",
    "republik korea",
    "république de corée",
    "república de corea",
    "repubblica di corea",
    "corea",
    "coreia",
    "大韓民國",
    "大韩民国",
    "大韓民国",
    "đại hàn dân quốc",
    "kr-",
    "kr-kr",
];

/// 关键词无法安全覆盖的写法，按顺序匹配原始文本
pub const KOREA_PATTERNS: &[&str] = &[
    r"(?i)\b(South\s*Korea|Korea\s*Republic|Republic\s*of\s*Korea)\b",
    r"\b(대한민국|한국)\b",
    r"(?i)\bKR\b",
    r"(?i)\bKOR\b",
    r"\+82\b",
];

/// 含有韩国关键词但指代朝鲜的写法
pub const NORTH_KOREA_MARKERS: &[&str] = &[
    "north korea",
    "korea, north",
    "korea (north)",
    "n. korea",
    "democratic people",
    "dprk",
    "북한",
    "조선민주주의",
    // 다른 언어
    "nordkorea",
    "nord-korea",
    "noord-korea",
    "corea del norte",
    "corea del nord",
    "coreia do norte",
    "corée du nord",
    "coree du nord",
    "demokratische volksrepublik",
    "popular democrática",
    "popolare democratica",
    "populaire démocratique",
    "северная корея",
    "кндр",
    "كوريا الشمالية",
    "北朝鮮",
    "朝鲜",
    "bắc triều tiên",
];

/// 短代码只按完整词匹配的最大长度
pub const SHORT_CODE_MAX_LEN: usize = 3;

/// 控件属性或标签中出现即视为国家选择器
pub const COUNTRY_INDICATORS: &[&str] = &[
    "country",
    "nation",
    "nationality",
    "location",
    "region",
    "국가",
    "나라",
    "지역",
];

/// 用于识别国家列表的常见国家名
pub const SAMPLE_COUNTRIES: &[&str] = &["united states", "japan", "china", "canada"];

/// 选项数超过该值才进行抽样
pub const OPTION_SAMPLE_THRESHOLD: usize = 10;

/// 抽样窗口：跳过第一个选项，最多取随后 9 个
pub const OPTION_SAMPLE_SKIP: usize = 1;
pub const OPTION_SAMPLE_SIZE: usize = 9;

/// 声明为国家选择器的类名
pub const COUNTRY_SELECT_CLASS: &str = "country-select";

/// 自定义下拉菜单等待时间
pub const DEFAULT_OPTION_TIMEOUT: Duration = Duration::from_millis(500);

/// 等待期间的轮询间隔
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);
