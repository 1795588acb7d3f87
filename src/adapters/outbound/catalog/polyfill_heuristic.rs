//! Classifies es-shims style package names (`array.prototype.findlast`)
//! into the native API they polyfill.

/// Globals whose methods the es-shims family polyfills
const GLOBALS: [(&str, &str); 12] = [
    ("array", "Array"),
    ("function", "Function"),
    ("map", "Map"),
    ("math", "Math"),
    ("number", "Number"),
    ("object", "Object"),
    ("promise", "Promise"),
    ("reflect", "Reflect"),
    ("regexp", "RegExp"),
    ("set", "Set"),
    ("string", "String"),
    ("symbol", "Symbol"),
];

/// Package names are lowercase; the native member names are not
const MEMBER_SPELLINGS: [&str; 32] = [
    "allSettled",
    "codePointAt",
    "copyWithin",
    "endsWith",
    "findIndex",
    "findLast",
    "findLastIndex",
    "flatMap",
    "forEach",
    "fromEntries",
    "getOwnPropertyDescriptors",
    "getPrototypeOf",
    "groupBy",
    "hasOwn",
    "isFinite",
    "isInteger",
    "isNaN",
    "isSafeInteger",
    "lastIndexOf",
    "matchAll",
    "ownKeys",
    "padEnd",
    "padStart",
    "reduceRight",
    "replaceAll",
    "startsWith",
    "toReversed",
    "toSorted",
    "toSpliced",
    "trimEnd",
    "trimStart",
    "withResolvers",
];

fn native_global(name: &str) -> Option<&'static str> {
    GLOBALS
        .iter()
        .find(|(package, _)| *package == name)
        .map(|(_, native)| *native)
}

fn member_spelling(member: &str) -> String {
    MEMBER_SPELLINGS
        .iter()
        .find(|known| known.eq_ignore_ascii_case(member))
        .map_or_else(|| member.to_string(), |known| known.to_string())
}

/// Returns the native replacement for a polyfill package, or `None` when the
/// name does not follow the `<global>[.prototype].<member>` convention.
pub fn classify_polyfill(package_name: &str) -> Option<String> {
    if package_name == "globalthis" {
        return Some("globalThis".to_string());
    }

    let mut parts = package_name.split('.');
    let global = native_global(parts.next()?)?;
    let rest: Vec<&str> = parts.collect();

    match rest.as_slice() {
        ["prototype", member] if !member.is_empty() => {
            Some(format!("{}.prototype.{}", global, member_spelling(member)))
        }
        [member] if !member.is_empty() && *member != "prototype" => {
            Some(format!("{}.{}", global, member_spelling(member)))
        }
        _ => None,
    }
}
