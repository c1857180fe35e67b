/// Feeds read when no feeds file is given: science, technology, world news
/// and nuclear policy publishers.
pub const DEFAULT_FEEDS: &[&str] = &[
    // News & Science
    "https://rss.nytimes.com/services/xml/rss/nyt/Science.xml",
    "https://www.sciencedaily.com/rss/matter_energy/nuclear_energy.xml",
    "https://www.sciencedaily.com/rss/matter_energy/quantum_physics.xml",
    "https://www.nasa.gov/rss/dyn/breaking_news.rss",
    "https://phys.org/rss-feed/breaking/",
    "https://www.sciencedaily.com/rss/all.xml",
    "https://www.newscientist.com/feed/home",
    "https://www.science.org/rss/news_current.xml",
    "https://www.the-scientist.com/rss",
    "https://techcrunch.com/feed/",
    "https://www.theverge.com/rss/index.xml",
    "https://www.wired.com/feed/rss",
    "https://feeds.arstechnica.com/arstechnica/index",
    "https://www.engadget.com/rss.xml",
    // Global News
    "https://www.aljazeera.com/xml/rss/all.xml",
    "https://timesofindia.indiatimes.com/rssfeeds/4719148.cms",
    "https://www3.nhk.or.jp/rss/news/cat0.xml",
    "https://www.cbc.ca/cmlink/rss-world",
    "https://canarymedia.com/rss.rss",
    "https://apnews.com/index.rss",
    "https://rss.nytimes.com/services/xml/rss/nyt/US.xml",
    "https://rss.nytimes.com/services/xml/rss/nyt/World.xml",
    // Nuclear Policy, Regulation, and Advocacy
    "https://nuclear-news.net/feed/",
    "https://neutronbytes.com/feed/",
    "https://www.iaea.org/rss/news.xml",
    "https://thebulletin.org/search-feed",
    "https://carnegieendowment.org/feed/proliferation-news",
];

pub const DEFAULT_KEYWORDS: &[&str] = &[
    // Core nuclear terms
    "nuclear",
    "LPO",
    "DOE",
    "NRC",
    "IAEA",
    "tritium",
    "uranium",
    "atomic",
    "fusion",
    "fission",
    "reactor",
    "plasma",
    "neutron",
    "isotope",
    "radiation",
    "particle",
    "quantum",
    // Advanced technical terms
    "deuterium",
    "tokamak",
    "breeder reactor",
    "high energy physics",
    "radioisotope",
    "criticality",
    "chain reaction",
    "nuclear waste",
    "spent fuel",
    "containment",
    "reprocessing",
    "coolant leak",
    "thermal neutron",
    "cross-section",
    "nuclear fuel cycle",
    // Policy & disarmament
    "arms control",
    "nuclear treaty",
    "non-proliferation",
    "START",
    "CTBT",
    "NPT",
    "deterrence",
    "disarmament",
    // Emerging science terms
    "muon",
    "stellarator",
    "quark",
    "superconducting",
    "fusion ignition",
    "neutrino",
    "synchrotron",
];
