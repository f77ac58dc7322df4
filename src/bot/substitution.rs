// src/bot/substitution.rs - Strictness-tiered lookalike tables and the noise model

use std::collections::HashMap;

use crate::types::StrictnessLevel;

/// Separator "noise" a user may wedge between letters to dodge a literal
/// match: punctuation, symbols, separators, whitespace, plus a few extras
/// seen in the wild. Lazy and zero-width-capable, so absent noise matches
/// too. Appended after every letter fragment by the word compiler.
pub const NOISE: &str = r"[\p{P}\p{S}\p{Z}\s~_^\-=*]*?";

type CharTable = &'static [(char, &'static str)];

// Fragments are raw alternations in lowercase; the combined matcher is
// compiled case-insensitively with Unicode folding, and the word compiler
// wraps each fragment in a non-capturing group before concatenation.
//
// Each level's table overrides the one below it, and every override widens
// what the previous fragment accepted. That layering is what makes the
// monotonic-widening guarantee hold by construction.

/// Level 1: basic digit lookalikes.
const LEVEL_1: CharTable = &[
    ('a', "[a4]+"),
    ('b', "[b8]+"),
    ('c', "c+"),
    ('d', "d+"),
    ('e', "[e3]+"),
    ('f', "f+"),
    ('g', "[g6]+"),
    ('h', "h+"),
    ('i', "[i1]+"),
    ('j', "j+"),
    ('k', "k+"),
    ('l', "[l1]+"),
    ('m', "m+"),
    ('n', "n+"),
    ('o', "[o0]+"),
    ('p', "p+"),
    ('q', "[q9]+"),
    ('r', "r+"),
    ('s', "[s5]+"),
    ('t', "[t7]+"),
    ('u', "u+"),
    ('v', "v+"),
    ('w', "w+"),
    ('x', "x+"),
    ('y', "y+"),
    ('z', "[z2]+"),
];

/// Level 2: phonetic substitutions.
const LEVEL_2: CharTable = &[('f', "f+|ph")];

/// Level 3: bracket and ASCII-art glyphs.
const LEVEL_3: CharTable = &[
    ('a', r"[a@4]+|\(\)|\{\}|\[\]|<>"),
    ('b', r"[b8]+|13|\|3"),
    ('c', r"c+|\(+|\[+|\{+|<+"),
    ('d', r"d+|\|\)+"),
    ('g', "[g69]+"),
    ('h', "h+|#"),
    ('i', "[i1!]+"),
    ('k', r"k+|\|<|\|\("),
    ('l', r"[l1|!]+|\|+"),
    ('m', r"m+|/\\/\\|nn"),
    ('n', r"n+|/\\/|\|\|"),
    ('o', r"[o0]+|\(\)|\[\]|\{\}|<>"),
    ('p', r"p+|\|\*"),
    ('r', r"r+|\|2"),
    ('s', "[s5]+|z|2"),
    ('t', r"[t7]+|\+"),
    ('u', r"u+|\(\)|\|_\|"),
    ('v', r"v+|\\/|\|/"),
    ('w', r"w+|\\/\\/|vv"),
    ('x', "x+|%|><"),
    ('z', "[z2]+|s|5"),
];

/// Level 4: accented letters, currency/symbol lookalikes, enclosed
/// alphanumerics.
const LEVEL_4: CharTable = &[
    ('a', r"[a@4àáâäæãåα🅰]+|\(\)|\{\}|\[\]|<>"),
    ('b', r"[b8ß🅱]+|13|\|3"),
    ('c', r"[cç¢🅲]+|\(+|\[+|\{+|<+"),
    ('d', r"[d🅳]+|\|\)+"),
    ('e', "[e3èéêë€🅴]+"),
    ('f', "[fƒ🅵]+|ph"),
    ('g', "[g69🅶]+"),
    ('h', "[h#🅷]+"),
    ('i', "[i1!|íìîï🅸]+"),
    ('j', "[j🅹]+"),
    ('k', r"[kκ🅺]+|\|<|\|\("),
    ('l', r"[l1|!🅻]+|\|+"),
    ('m', r"[m🅼]+|/\\/\\|nn"),
    ('n', r"[nñ🅽]+|/\\/|\|\|"),
    ('o', r"[o0°🅾]+|\(\)|\[\]|\{\}|<>"),
    ('p', r"[pρ🅿]+|\|\*"),
    ('q', "[q9🆀]+"),
    ('r', r"[r🆁]+|\|2"),
    ('s', "[s5$🆂]+|z|2"),
    ('t', r"[t7†🆃]+|\+"),
    ('u', r"[u🆄]+|\(\)|\|_\|"),
    ('v', r"[vν🆅]+|\\/|\|/"),
    ('w', r"[wω🆆]+|\\/\\/|vv"),
    ('x', "[x×✕✖❌🆇]+|%|><"),
    ('y', "[y¥🆈]+"),
    ('z', "[z2🆉]+|s|5"),
];

/// Level 5: cross-script homoglyphs (Cyrillic, Greek), mathematical
/// alphanumerics, regional indicators, emoji shapes, and multi-character
/// ASCII composites.
const LEVEL_5: CharTable = &[
    ('a', r"[a@4àáâäæãåαа🅰🇦𝔞𝕒]+|/\\|\\/|\(\)|\{\}|\[\]|<>|/[_\-]?\\"),
    ('b', r"[b8ßβ🅱🇧𝔟𝕓]+|13|\|3|\|\)\|"),
    ('c', r"[cç¢с🅲🇨𝔠𝕔]+|\(+|\[+|\{+|<+|[<\[{][_\-=~*]*[>\]}]"),
    ('d', r"[d🅳🇩𝔡𝕕]+|\|\)+|\)\|+"),
    ('e', "[e3èéêë€εе🅴🇪𝔢]+"),
    ('f', "[fƒ🅵🇫𝔣]+|ph"),
    ('g', "[g69🅶🇬𝔤]+"),
    ('h', r"[h#н🅷🇭𝔥]+|\|-\|"),
    ('i', r"[i1!|líìîï¡🅸🇮𝔦]+|\]\[|\|\|"),
    ('j', r"[j🅹🇯𝔧]+|_\|+"),
    ('k', r"[kκк🅺🇰𝔨]+|\|<|\|\{|\|\(|\)\|"),
    ('l', r"[l1|!🅻🇱𝔩]+|\|+"),
    ('m', r"[mм🅼🇲𝔪]+|/\\/\\|\|/\|/|nn|ivi|/v\\"),
    ('n', r"[nñηи🅽🇳𝔫]+|/\\/|\\/\\|\|\|"),
    (
        'o',
        r"[o0°οоøⓞ○◎◯⭘⭕🔵🟢🟣🟠🟡🟤⚪⚫🔘🅾🇴]+|\(\)|\[\]|\{\}|<>|\|\||\|o\||0_|_0|\(o\)|_\(\)_",
    ),
    ('p', r"[pρр🅿🇵𝔭]+|\|\*|q\)"),
    ('q', "[q9🆀🇶𝔮]+"),
    ('r', r"[rя🆁🇷𝔯]+|\|2|12|\|\?"),
    ('s', "[s5$§🆂🇸𝔰]+|z|2"),
    ('t', r"[t7†🆃🇹𝔱]+|\+|\|-|\|_|-\|"),
    ('u', r"[uυ🆄🇺𝔲]+|\(\)|v\\v|\|_\|"),
    ('v', r"[vν🆅🇻𝔳]+|\\/|\|/"),
    ('w', r"[wωш🆆🇼𝔴]+|\\/\\/|\|/\|/|vv|\|v\|"),
    ('x', r"[x×✕✖❌🆇🇽𝔵]+|%|><|\)\("),
    ('y', r"[y¥γу🆈🇾𝔶]+|j\|"),
    ('z', "[z2ζ🆉🇿𝔷]+|s|5"),
];

/// Build the character substitution table for a strictness level. Level 0
/// is empty: every character matches literally. Higher levels layer their
/// overrides on top of the levels below, so tolerance only ever widens.
pub fn substitution_map(level: StrictnessLevel) -> HashMap<char, &'static str> {
    let tiers: [CharTable; 5] = [LEVEL_1, LEVEL_2, LEVEL_3, LEVEL_4, LEVEL_5];
    let mut map = HashMap::new();
    for tier in tiers.iter().take(level.get() as usize) {
        for &(ch, fragment) in *tier {
            map.insert(ch, fragment);
        }
    }
    map
}
