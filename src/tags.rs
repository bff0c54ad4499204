//! Tag classification tables and the attribute-name rewrite table.

use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

lazy_static! {
    /// Elements that never carry children.
    pub static ref VOID_ELEMENTS: HashSet<&'static str> = [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ]
    .into_iter()
    .collect();

    /// Elements whose whitespace-only text children are not significant.
    pub static ref NO_WHITESPACE_ELEMENTS: HashSet<&'static str> = [
        "table", "tbody", "tfoot", "thead", "tr",
    ]
    .into_iter()
    .collect();

    static ref DOCUMENT_ROOTS: HashSet<&'static str> = ["html", "head", "body"].into_iter().collect();

    /// Tags the host recognizes as HTML or SVG elements.
    pub static ref KNOWN_ELEMENTS: HashSet<&'static str> = [
        // document
        "html", "head", "body", "title", "base", "link", "meta", "style", "script", "noscript",
        "template", "slot",
        // sections
        "main", "header", "footer", "nav", "section", "article", "aside", "address", "h1", "h2",
        "h3", "h4", "h5", "h6", "hgroup", "search",
        // grouping
        "div", "p", "hr", "pre", "blockquote", "ol", "ul", "li", "menu", "dl", "dt", "dd",
        "figure", "figcaption",
        // text-level
        "a", "em", "strong", "small", "s", "cite", "q", "dfn", "abbr", "ruby", "rt", "rp",
        "data", "time", "code", "var", "samp", "kbd", "sub", "sup", "i", "b", "u", "mark",
        "bdi", "bdo", "span", "br", "wbr", "ins", "del",
        // embedded
        "picture", "source", "img", "iframe", "embed", "object", "param", "video", "audio",
        "track", "map", "area", "canvas",
        // tables
        "table", "caption", "colgroup", "col", "tbody", "thead", "tfoot", "tr", "td", "th",
        // forms
        "form", "label", "input", "button", "select", "datalist", "optgroup", "option",
        "textarea", "output", "progress", "meter", "fieldset", "legend",
        // interactive
        "details", "summary", "dialog",
        // svg
        "svg", "g", "defs", "symbol", "use", "path", "rect", "circle", "ellipse", "line",
        "polyline", "polygon", "text", "tspan", "textpath", "lineargradient",
        "radialgradient", "stop", "clippath", "mask", "pattern", "image", "filter",
        "foreignobject", "marker", "desc",
        // math
        "math",
    ]
    .into_iter()
    .collect();

    /// Markup attribute names rewritten to their property names.
    pub static ref ATTRIBUTE_NAMES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("class", "className");
        m.insert("for", "htmlFor");
        m.insert("accept-charset", "acceptCharset");
        m.insert("http-equiv", "httpEquiv");
        m.insert("accesskey", "accessKey");
        m.insert("autocapitalize", "autoCapitalize");
        m.insert("autocomplete", "autoComplete");
        m.insert("autocorrect", "autoCorrect");
        m.insert("autofocus", "autoFocus");
        m.insert("autoplay", "autoPlay");
        m.insert("cellpadding", "cellPadding");
        m.insert("cellspacing", "cellSpacing");
        m.insert("charset", "charSet");
        m.insert("colspan", "colSpan");
        m.insert("contenteditable", "contentEditable");
        m.insert("contextmenu", "contextMenu");
        m.insert("crossorigin", "crossOrigin");
        m.insert("datetime", "dateTime");
        m.insert("enctype", "encType");
        m.insert("formaction", "formAction");
        m.insert("formenctype", "formEncType");
        m.insert("formmethod", "formMethod");
        m.insert("formnovalidate", "formNoValidate");
        m.insert("formtarget", "formTarget");
        m.insert("frameborder", "frameBorder");
        m.insert("hreflang", "hrefLang");
        m.insert("inputmode", "inputMode");
        m.insert("itemprop", "itemProp");
        m.insert("itemscope", "itemScope");
        m.insert("itemtype", "itemType");
        m.insert("marginheight", "marginHeight");
        m.insert("marginwidth", "marginWidth");
        m.insert("maxlength", "maxLength");
        m.insert("mediagroup", "mediaGroup");
        m.insert("minlength", "minLength");
        m.insert("novalidate", "noValidate");
        m.insert("playsinline", "playsInline");
        m.insert("radiogroup", "radioGroup");
        m.insert("readonly", "readOnly");
        m.insert("referrerpolicy", "referrerPolicy");
        m.insert("rowspan", "rowSpan");
        m.insert("spellcheck", "spellCheck");
        m.insert("srcdoc", "srcDoc");
        m.insert("srclang", "srcLang");
        m.insert("srcset", "srcSet");
        m.insert("tabindex", "tabIndex");
        m.insert("usemap", "useMap");
        // SVG
        m.insert("viewbox", "viewBox");
        m.insert("preserveaspectratio", "preserveAspectRatio");
        m.insert("gradienttransform", "gradientTransform");
        m.insert("gradientunits", "gradientUnits");
        m.insert("patterntransform", "patternTransform");
        m.insert("patternunits", "patternUnits");
        m.insert("clippathunits", "clipPathUnits");
        m.insert("markerheight", "markerHeight");
        m.insert("markerwidth", "markerWidth");
        m.insert("pathlength", "pathLength");
        m.insert("stddeviation", "stdDeviation");
        m.insert("textlength", "textLength");
        m.insert("clip-path", "clipPath");
        m.insert("clip-rule", "clipRule");
        m.insert("fill-opacity", "fillOpacity");
        m.insert("fill-rule", "fillRule");
        m.insert("font-family", "fontFamily");
        m.insert("font-size", "fontSize");
        m.insert("font-weight", "fontWeight");
        m.insert("stop-color", "stopColor");
        m.insert("stop-opacity", "stopOpacity");
        m.insert("stroke-dasharray", "strokeDasharray");
        m.insert("stroke-dashoffset", "strokeDashoffset");
        m.insert("stroke-linecap", "strokeLinecap");
        m.insert("stroke-linejoin", "strokeLinejoin");
        m.insert("stroke-miterlimit", "strokeMiterlimit");
        m.insert("stroke-opacity", "strokeOpacity");
        m.insert("stroke-width", "strokeWidth");
        m.insert("text-anchor", "textAnchor");
        m.insert("xlink:href", "xlinkHref");
        m.insert("xml:lang", "xmlLang");
        m.insert("xml:space", "xmlSpace");
        m
    };
}

/// Rewrites a markup attribute name to its property name; unknown names pass through.
pub fn normalize_attribute_name(name: &str) -> String {
    match ATTRIBUTE_NAMES.get(name) {
        Some(&mapped) => mapped.to_string(),
        None => name.to_string(),
    }
}

pub fn can_have_children(tag: &str) -> bool {
    !VOID_ELEMENTS.contains(tag.to_ascii_lowercase().as_str())
}

pub fn can_have_whitespace(tag: &str) -> bool {
    !NO_WHITESPACE_ELEMENTS.contains(tag.to_ascii_lowercase().as_str())
}

/// `html`, `head` and `body` are never rendered; their children are promoted.
pub fn is_document_root(tag: &str) -> bool {
    DOCUMENT_ROOTS.contains(tag.to_ascii_lowercase().as_str())
}

/// Hyphenated names are custom elements and always recognized.
pub fn is_unrecognized_element(tag: &str) -> bool {
    if tag.contains('-') {
        return false;
    }
    !KNOWN_ELEMENTS.contains(tag.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_rewrites() {
        assert_eq!(normalize_attribute_name("class"), "className");
        assert_eq!(normalize_attribute_name("for"), "htmlFor");
        assert_eq!(normalize_attribute_name("viewbox"), "viewBox");
        assert_eq!(normalize_attribute_name("data-id"), "data-id");
    }

    #[test]
    fn test_classification() {
        assert!(!can_have_children("img"));
        assert!(!can_have_children("BR"));
        assert!(can_have_children("div"));
        assert!(!can_have_whitespace("tbody"));
        assert!(is_document_root("BODY"));
        assert!(is_unrecognized_element("foo"));
        assert!(!is_unrecognized_element("my-widget"));
        assert!(!is_unrecognized_element("Section"));
    }
}
