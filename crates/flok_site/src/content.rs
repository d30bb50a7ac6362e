//! Static page copy

/// Cover layer under the masked hero
pub mod cover {
    pub const LABEL: &str = "F — S";
    pub const TITLE: [&str; 2] = ["FLOK", "STUDIO"];
    pub const EMAIL: &str = "EMAIL ME";
}

/// Masked main hero revealed by scrolling
pub mod main_hero {
    pub const BRAND: &str = "Flok® Studio";
    pub const TITLE: &str = "We Create Brands That Sticks";
    pub const COPY: &str = "We help founders grow through bold design, sharp strategy, and smart \
                            marketing that drives recognition, engagement, and long-term brand loyalty.";
    pub const CTA: &str = "GET IN TOUCH";
}

/// "Bringing your vision to life" section
pub mod intro {
    pub const HEADING: [&str; 2] = ["BRINGING YOUR", "VISION TO LIFE ."];
    pub const PARAGRAPH: &str = "Where imagination, strategy, and storytelling collide to build \
                                 unforgettable brand experiences that move people and grow businesses.";
    pub const BUTTON: &str = "Let’s Collab!";
    pub const IMAGES: [&str; 2] = ["/images/hero-1.avif", "/images/hero-2.avif"];
}

/// One achievement statistic
#[derive(Clone, Copy, Debug)]
pub struct Stat {
    pub prefix: &'static str,
    pub end: u32,
    pub suffix: &'static str,
    pub title: &'static str,
    pub body: &'static str,
}

pub mod achievements {
    use super::Stat;

    pub const HEADING: &str = "As a data driven team, we let the numbers speak for us";
    pub const CTA: &str = "GET IN TOUCH";
    /// Arrows per conveyor row
    pub const ARROW_COUNT: usize = 6;
    pub const ARROW_LEFT: &str = "›";
    pub const ARROW_RIGHT: &str = "‹";

    pub const STATS: [Stat; 3] = [
        Stat {
            prefix: "$",
            end: 500,
            suffix: "M",
            title: "Raised by our clients",
            body: "Helping Startups and business to get funding and grow",
        },
        Stat {
            prefix: "",
            end: 50,
            suffix: "+",
            title: "Websites and apps",
            body: "We support founders everywhere to make their mark",
        },
        Stat {
            prefix: "",
            end: 12,
            suffix: "+",
            title: "Years of experience",
            body: "We're a knit-packed team of trusted marketers & designers",
        },
    ];
}

/// One service card
#[derive(Clone, Copy, Debug)]
pub struct ServiceCard {
    pub label: Option<&'static str>,
    pub title: &'static str,
    pub body: Option<&'static str>,
    /// Card height in pixels
    pub height: f32,
    /// Whether the card hosts the thumbnail marquee
    pub marquee: bool,
}

pub mod services {
    use super::ServiceCard;

    pub const LABEL: &str = "SERVICES";
    pub const HEADING: &str = "Covering Every Part To Make You Go Viral";

    /// Two thumbnails followed by their duplicates for a seamless loop
    pub const THUMBNAILS: [&str; 4] = [
        "/images/services_image_2.avif",
        "/images/services_image_3.avif",
        "/images/services_image_2.avif",
        "/images/services_image_3.avif",
    ];

    pub const CARDS: [ServiceCard; 4] = [
        ServiceCard {
            label: Some("YOUTUBE AND PODCASTS"),
            title: "Long-Form Editing",
            body: None,
            height: 320.0,
            marquee: false,
        },
        ServiceCard {
            label: None,
            title: "Short-Form Editing",
            body: Some(
                "Edits that keep attention and increase watch time on TikTok, Reels, and YouTube Shorts.",
            ),
            height: 360.0,
            marquee: false,
        },
        ServiceCard {
            label: Some("BOOST CTR"),
            title: "Thumbnails",
            body: None,
            height: 320.0,
            marquee: true,
        },
        ServiceCard {
            label: None,
            title: "Animations",
            body: Some("Premium long-form video editing tailored for YouTube and podcasts."),
            height: 260.0,
            marquee: false,
        },
    ];
}
