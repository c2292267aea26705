//! Built-in feed and keyword lists used when the config file names none

/// (name, url) of the default defence and security feeds, in polling order
pub const DEFAULT_FEEDS: &[(&str, &str)] = &[
    ("Defense News", "https://www.defensenews.com/arc/outboundfeeds/rss/"),
    ("Breaking Defense", "https://breakingdefense.com/feed/"),
    ("C4ISRNET", "https://www.c4isrnet.com/arc/outboundfeeds/rss/"),
    ("The War Zone", "https://www.thedrive.com/the-war-zone/rss"),
    ("RUSI", "https://rusi.org/rss.xml"),
    ("IISS", "https://www.iiss.org/news-insights/rss/"),
    (
        "Gov.uk MOD",
        "https://www.gov.uk/government/organisations/ministry-of-defence.atom",
    ),
    (
        "Gov.uk News",
        "https://www.gov.uk/search/news-and-communications.atom",
    ),
    (
        "Gov.uk Home Office",
        "https://www.gov.uk/government/organisations/home-office.atom",
    ),
    (
        "UK Strategic Command",
        "https://www.gov.uk/government/organisations/strategic-command.atom",
    ),
    (
        "US DoD",
        "https://www.defense.gov/DesktopModules/ArticleCS/RSS.ashx?ContentType=1&Site=945",
    ),
    (
        "US DoD Contracts",
        "https://www.defense.gov/DesktopModules/ArticleCS/RSS.ashx?ContentType=1&Site=3",
    ),
    ("NATO", "https://www.nato.int/cps/en/natohq/news.rss"),
];

/// Default keyword phrases; order decides the order of matches in the digest
pub const DEFAULT_KEYWORDS: &[&str] = &[
    // Core capabilities
    "ISR",
    "electronic warfare",
    "procurement",
    "Digital Targeting Web",
    "DTW",
    "CEMA",
    "Digital Secure Access",
    "Cyber",
    "Data",
    "Data Integration",
    "Digital Twin",
    "Simulation",
    "Synthetic data",
    "Drone",
    "PNT",
    // CACI
    "CACI",
    "CACI International",
    "CACI Ltd",
    "CACI UK",
    "CACI contract",
    "awarded to CACI",
    "CACI win",
    "CACI framework",
    "CACI acquisition",
    "CACI expansion",
    "CACI partnership",
    "CACI data platform",
    "CACI analytics solution",
    // Data and analytics
    "data analytics",
    "data fusion",
    "data management",
    "data integration",
    "defence data platform",
    "battlefield data",
    "national security analytics",
    "intelligence modernisation",
    // Digital transformation
    "digital services",
    "digital transformation",
    "digital twins",
    "secure digital twin",
    "defence digital transformation",
    "MoD digital transformation",
    "Home Office data modernisation",
    "public sector digital",
    "defence digital service",
    // AI
    "AI",
    "artificial intelligence",
    "machine learning",
    "defence AI",
    "AI-enabled decision support",
    "national security AI",
    "defence AI regulation",
    "AI assurance",
    "ethical AI",
    "AI arms race",
    "data ethics",
    // Command and control
    "joint all-domain command and control",
    "JADC2",
    "mission systems",
    "command and control",
    "multi-domain operations",
    // Security and resilience
    "cyber security",
    "secure by design",
    "cyber resilience",
    "data sovereignty",
    "cyber act",
    // Geospatial
    "geospatial data",
    "GIS",
    "mapping",
    "location intelligence",
    // Emerging technology
    "quantum",
    "edge computing",
    "space domain awareness",
    "dual-use technology",
    // Services
    "defence consulting",
    "systems engineering",
    "enterprise architecture",
    // Government organisations and programmes
    "NATO",
    "Ministry of Defence",
    "MoD",
    "Home Office",
    "UK Strategic Command",
    "Data Strategy for Defence",
    "NATO innovation fund",
    "Defence AI Centre",
    "DSTL",
    "Crown Commercial Service",
    "CCS frameworks",
    "MoD data strategy",
    "NATO data strategy",
    // Procurement and frameworks
    "defence procurement",
    "framework",
    "contract award",
    "tender",
    "defence procurement reform",
    "digital framework",
    "G-Cloud",
    "DSP",
    "framework awards",
    "Digital Outcomes",
    "MOD D2N2",
    "MOD contracts",
    "government framework award",
    // International partnerships
    "AUKUS",
    "Five Eyes",
    "defence tech collaboration",
    // Contractors
    "Palantir",
    "Anduril",
    "BAE Systems",
    "QinetiQ",
    "Leonardo",
    "Thales",
    "Raytheon",
    "Babcock",
    "CGI",
    "Leidos",
    "KBR",
    "Serco",
    // Cloud providers
    "AWS Defence",
    "Microsoft Defence",
    "Google Cloud Defence",
    // Policy and budget
    "defence budget",
    "MoD funding",
    "Integrated Review",
    "Strategic Defence Review",
    "national security legislation",
    "defence innovation",
    "sovereign capability",
    "trusted supplier",
    "defence supply chain",
    // Geopolitics
    "Ukraine",
    "Indo-Pacific",
    "China",
    "Russia",
    "semiconductors",
];
