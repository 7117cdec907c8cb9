//! [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
//!
//! Selecting the document mode from a DOCTYPE token.

use super::sink::QuirksMode;
use crate::tokenizer::Doctype;

/// "The public identifier starts with: ..." (quirks mode)
const QUIRKS_PUBLIC_ID_PREFIXES: &[&str] = &[
    "+//silmaril//dtd html pro v0r11 19970101//",
    "-//as//dtd html 3.0 aswedit + extensions//",
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
    "-//ietf//dtd html 2.0 level 1//",
    "-//ietf//dtd html 2.0 level 2//",
    "-//ietf//dtd html 2.0 strict level 1//",
    "-//ietf//dtd html 2.0 strict level 2//",
    "-//ietf//dtd html 2.0 strict//",
    "-//ietf//dtd html 2.0//",
    "-//ietf//dtd html 2.1e//",
    "-//ietf//dtd html 3.0//",
    "-//ietf//dtd html 3.2 final//",
    "-//ietf//dtd html 3.2//",
    "-//ietf//dtd html 3//",
    "-//ietf//dtd html level 0//",
    "-//ietf//dtd html level 1//",
    "-//ietf//dtd html level 2//",
    "-//ietf//dtd html level 3//",
    "-//ietf//dtd html strict level 0//",
    "-//ietf//dtd html strict level 1//",
    "-//ietf//dtd html strict level 2//",
    "-//ietf//dtd html strict level 3//",
    "-//ietf//dtd html strict//",
    "-//ietf//dtd html//",
    "-//metrius//dtd metrius presentational//",
    "-//microsoft//dtd internet explorer 2.0 html strict//",
    "-//microsoft//dtd internet explorer 2.0 html//",
    "-//microsoft//dtd internet explorer 2.0 tables//",
    "-//microsoft//dtd internet explorer 3.0 html strict//",
    "-//microsoft//dtd internet explorer 3.0 html//",
    "-//microsoft//dtd internet explorer 3.0 tables//",
    "-//netscape comm. corp.//dtd html//",
    "-//netscape comm. corp.//dtd strict html//",
    "-//o'reilly and associates//dtd html 2.0//",
    "-//o'reilly and associates//dtd html extended 1.0//",
    "-//o'reilly and associates//dtd html extended relaxed 1.0//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sun microsystems corp.//dtd hotjava html//",
    "-//sun microsystems corp.//dtd hotjava strict html//",
    "-//w3c//dtd html 3 1995-03-24//",
    "-//w3c//dtd html 3.2 draft//",
    "-//w3c//dtd html 3.2 final//",
    "-//w3c//dtd html 3.2//",
    "-//w3c//dtd html 3.2s draft//",
    "-//w3c//dtd html 4.0 frameset//",
    "-//w3c//dtd html 4.0 transitional//",
    "-//w3c//dtd html experimental 19960712//",
    "-//w3c//dtd html experimental 970421//",
    "-//w3c//dtd w3 html//",
    "-//w3o//dtd w3 html 3.0//",
    "-//webtechs//dtd mozilla html 2.0//",
    "-//webtechs//dtd mozilla html//",
];

/// "The public identifier is set to: ..." (quirks mode)
const QUIRKS_PUBLIC_IDS: &[&str] = &[
    "-//w3o//dtd w3 html strict 3.0//en//",
    "-/w3c/dtd html 4.0 transitional/en",
    "html",
];

/// The legacy HTML 4.01 DOCTYPEs whose mode depends on the system identifier.
const HTML4_PUBLIC_ID_PREFIXES: &[&str] = &[
    "-//w3c//dtd html 4.01 frameset//",
    "-//w3c//dtd html 4.01 transitional//",
];

/// "The public identifier starts with: "-//W3C//DTD XHTML 1.0 Frameset//",
/// "-//W3C//DTD XHTML 1.0 Transitional//"" (limited-quirks mode)
const LIMITED_QUIRKS_PUBLIC_ID_PREFIXES: &[&str] = &[
    "-//w3c//dtd xhtml 1.0 frameset//",
    "-//w3c//dtd xhtml 1.0 transitional//",
];

/// "If the DOCTYPE token's name is not "html", or the token's public
/// identifier is not missing, or the token's system identifier is neither
/// missing nor "about:legacy-compat", then there is a parse error."
pub fn is_bad_doctype(doctype: &Doctype) -> bool {
    doctype.name.as_deref() != Some("html")
        || doctype.public_identifier.is_some()
        || doctype
            .system_identifier
            .as_deref()
            .is_some_and(|id| id != "about:legacy-compat")
}

/// The document mode a DOCTYPE selects. `iframe_srcdoc` documents are never
/// in quirks mode.
pub fn quirks_mode_for(doctype: &Doctype, iframe_srcdoc: bool) -> QuirksMode {
    if iframe_srcdoc {
        return QuirksMode::NoQuirks;
    }
    let public = doctype
        .public_identifier
        .as_deref()
        .map(str::to_ascii_lowercase);
    let system = doctype
        .system_identifier
        .as_deref()
        .map(str::to_ascii_lowercase);
    let public_starts_with =
        |prefixes: &[&str]| public.as_deref().is_some_and(|id| prefixes.iter().any(|p| id.starts_with(p)));

    // "If the document is not an iframe srcdoc document, and the parser cannot
    // change the mode flag is false, and the DOCTYPE token matches one of the
    // conditions in the following list, then set the Document to quirks mode"
    if doctype.force_quirks
        || doctype.name.as_deref() != Some("html")
        || public.as_deref().is_some_and(|id| QUIRKS_PUBLIC_IDS.contains(&id))
        || system.as_deref() == Some("http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd")
        || public_starts_with(QUIRKS_PUBLIC_ID_PREFIXES)
        || (system.is_none() && public_starts_with(HTML4_PUBLIC_ID_PREFIXES))
    {
        return QuirksMode::Quirks;
    }

    // "Otherwise, if the document is not an iframe srcdoc document, and the
    // parser cannot change the mode flag is false, and the DOCTYPE token
    // matches one of the conditions in the following list, then then set the
    // Document to limited-quirks mode"
    if public_starts_with(LIMITED_QUIRKS_PUBLIC_ID_PREFIXES)
        || (system.is_some() && public_starts_with(HTML4_PUBLIC_ID_PREFIXES))
    {
        return QuirksMode::LimitedQuirks;
    }
    QuirksMode::NoQuirks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctype(name: &str, public: Option<&str>, system: Option<&str>) -> Doctype {
        Doctype {
            name: Some(name.to_string()),
            public_identifier: public.map(str::to_string),
            system_identifier: system.map(str::to_string),
            ..Doctype::default()
        }
    }

    #[test]
    fn test_html5_doctype_is_no_quirks() {
        let html = doctype("html", None, None);
        assert!(!is_bad_doctype(&html));
        assert_eq!(quirks_mode_for(&html, false), QuirksMode::NoQuirks);
    }

    #[test]
    fn test_legacy_doctypes() {
        let transitional = doctype("html", Some("-//W3C//DTD HTML 4.01 Transitional//EN"), None);
        assert_eq!(quirks_mode_for(&transitional, false), QuirksMode::Quirks);
        let with_system = doctype(
            "html",
            Some("-//W3C//DTD HTML 4.01 Transitional//EN"),
            Some("http://www.w3.org/TR/html4/loose.dtd"),
        );
        assert_eq!(quirks_mode_for(&with_system, false), QuirksMode::LimitedQuirks);
        assert!(is_bad_doctype(&with_system));
    }

    #[test]
    fn test_force_quirks_and_srcdoc() {
        let mut forced = doctype("html", None, None);
        forced.force_quirks = true;
        assert_eq!(quirks_mode_for(&forced, false), QuirksMode::Quirks);
        assert_eq!(quirks_mode_for(&forced, true), QuirksMode::NoQuirks);
    }
}
