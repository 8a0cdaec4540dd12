//! Browser identity rotation.
//!
//! Every outbound call gets a fresh `Identity`: a TLS client fingerprint
//! drawn from a fixed pool, the matching browser family and OS, a random
//! user-agent constrained to that pairing, and the static header set GMGN
//! expects from a real browser tab. Identities are values threaded through
//! the fetch call, never shared state, so concurrent requests cannot bleed
//! fingerprints into each other.

use rand::seq::SliceRandom;
use rquest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, HOST, REFERER, USER_AGENT,
};
use rquest_util::{Emulation, EmulationOS};

use super::user_agent;

/// TLS client identifiers known to pass GMGN's fingerprint checks, each
/// paired with the emulation preset that produces that handshake.
/// Only chrome/safari/firefox/opera families are eligible.
pub(crate) const IDENTIFIER_POOL: &[(&str, Emulation)] = &[
    ("chrome_100", Emulation::Chrome100),
    ("chrome_104", Emulation::Chrome104),
    ("chrome_105", Emulation::Chrome105),
    ("chrome_106", Emulation::Chrome106),
    ("chrome_107", Emulation::Chrome107),
    ("chrome_108", Emulation::Chrome108),
    ("chrome_109", Emulation::Chrome109),
    ("chrome_114", Emulation::Chrome114),
    ("chrome_116", Emulation::Chrome116),
    ("chrome_117", Emulation::Chrome117),
    ("chrome_118", Emulation::Chrome118),
    ("chrome_119", Emulation::Chrome119),
    ("chrome_120", Emulation::Chrome120),
    ("chrome_123", Emulation::Chrome123),
    ("chrome_124", Emulation::Chrome124),
    ("chrome_126", Emulation::Chrome126),
    ("chrome_127", Emulation::Chrome127),
    ("chrome_128", Emulation::Chrome128),
    ("chrome_129", Emulation::Chrome129),
    ("chrome_130", Emulation::Chrome130),
    ("chrome_131", Emulation::Chrome131),
    ("chrome_132", Emulation::Chrome132),
    ("chrome_133", Emulation::Chrome133),
    ("safari_15_3", Emulation::Safari15_3),
    ("safari_15_5", Emulation::Safari15_5),
    ("safari_16", Emulation::Safari16),
    ("safari_16_5", Emulation::Safari16_5),
    ("safari_17_0", Emulation::Safari17_0),
    ("safari_17_5", Emulation::Safari17_5),
    ("safari_18", Emulation::Safari18),
    ("safari_ios_16_5", Emulation::SafariIos16_5),
    ("safari_ios_17_2", Emulation::SafariIos17_2),
    ("safari_ios_17_4_1", Emulation::SafariIos17_4_1),
    ("firefox_109", Emulation::Firefox109),
    ("firefox_117", Emulation::Firefox117),
    ("firefox_128", Emulation::Firefox128),
    ("firefox_133", Emulation::Firefox133),
    ("opera_116", Emulation::Opera116),
    ("opera_117", Emulation::Opera117),
    ("opera_118", Emulation::Opera118),
    ("opera_119", Emulation::Opera119),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserFamily {
    Chrome,
    Safari,
    Firefox,
    Opera,
}

impl BrowserFamily {
    pub(crate) fn from_token(token: &str) -> Option<Self> {
        match token {
            "chrome" => Some(Self::Chrome),
            "safari" => Some(Self::Safari),
            "firefox" => Some(Self::Firefox),
            "opera" => Some(Self::Opera),
            _ => None,
        }
    }
}

/// Operating systems the identifier pool can embed. Desktop identifiers map
/// to Windows; only `*_ios_*` identifiers map to iOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Windows,
    Ios,
}

impl Os {
    pub(crate) fn emulation_os(&self) -> EmulationOS {
        match self {
            Self::Windows => EmulationOS::Windows,
            Self::Ios => EmulationOS::IOS,
        }
    }
}

/// One outbound call's worth of browser disguise. Built fresh per attempt
/// and discarded afterwards.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Pool identifier, e.g. `chrome_120` or `opera_118`. For opera this
    /// stays `opera_*` even though the user-agent is chrome-flavored.
    pub tls_identifier: &'static str,
    pub emulation: Emulation,
    pub family: BrowserFamily,
    /// Family used for user-agent generation; opera downgrades to chrome
    /// because no real opera user-agent pool exists upstream.
    pub ua_family: BrowserFamily,
    pub os: Os,
    pub user_agent: &'static str,
    pub headers: HeaderMap,
}

/// Draws a randomized identity per call. Holds only the provider host and
/// referer, both read-only, so a single rotator is safe to share.
#[derive(Debug, Clone)]
pub struct IdentityRotator {
    host: String,
    referer: String,
}

impl IdentityRotator {
    pub fn new(host: impl Into<String>) -> Self {
        let host = host.into();
        let referer = format!("https://{host}/");
        Self { host, referer }
    }

    /// Select a fresh identity: random TLS identifier, derived family/OS,
    /// matching random user-agent, static header set.
    pub fn next(&self) -> Identity {
        let mut rng = rand::thread_rng();
        let entry = IDENTIFIER_POOL
            .choose(&mut rng)
            .expect("identifier pool is a non-empty constant");
        let tls_identifier = entry.0;
        let emulation = entry.1.clone();

        let (family, os) = parse_identifier(tls_identifier);
        let ua_family = match family {
            BrowserFamily::Opera => BrowserFamily::Chrome,
            other => other,
        };
        let user_agent = user_agent::pick(ua_family, os, &mut rng);

        Identity {
            tls_identifier,
            emulation,
            family,
            ua_family,
            os,
            user_agent,
            headers: header_set(&self.host, &self.referer, user_agent),
        }
    }
}

/// Split `family_version[_rest]` on underscores and derive (family, OS).
/// The OS is iOS exactly when the version token is the iOS marker.
pub(crate) fn parse_identifier(identifier: &'static str) -> (BrowserFamily, Os) {
    let mut parts = identifier.split('_');
    let family = parts
        .next()
        .and_then(BrowserFamily::from_token)
        .expect("pool identifiers always start with a known family");
    let os = match parts.next() {
        Some(version) if version.eq_ignore_ascii_case("ios") => Os::Ios,
        _ => Os::Windows,
    };
    (family, os)
}

/// Static headers GMGN expects from a browser tab, plus the generated
/// user-agent. The referer is pinned to the provider site root.
fn header_set(host: &str, referer: &str, user_agent: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(host) {
        headers.insert(HOST, value);
    }
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("fr-FR,fr;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(HeaderName::from_static("dnt"), HeaderValue::from_static("1"));
    headers.insert(
        HeaderName::from_static("priority"),
        HeaderValue::from_static("u=1, i"),
    );
    if let Ok(value) = HeaderValue::from_str(referer) {
        headers.insert(REFERER, value);
    }
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent).unwrap_or(HeaderValue::from_static("Mozilla/5.0")),
    );
    headers
}
