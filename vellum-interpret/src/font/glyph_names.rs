// Glyph names of the Latin character set and some common additions, mapped to
// the Unicode code points they stand for.
use phf::phf_map;

pub(crate) fn get(name: &str) -> Option<char> {
    GLYPH_NAMES.get(name).copied()
}

static GLYPH_NAMES: phf::Map<&'static str, char> = phf_map! {
    "A" => '\u{41}',
    "AE" => '\u{c6}',
    "Aacute" => '\u{c1}',
    "Abreve" => '\u{102}',
    "Acircumflex" => '\u{c2}',
    "Adieresis" => '\u{c4}',
    "Agrave" => '\u{c0}',
    "Amacron" => '\u{100}',
    "Aogonek" => '\u{104}',
    "Aring" => '\u{c5}',
    "Atilde" => '\u{c3}',
    "B" => '\u{42}',
    "C" => '\u{43}',
    "Cacute" => '\u{106}',
    "Ccaron" => '\u{10c}',
    "Ccedilla" => '\u{c7}',
    "D" => '\u{44}',
    "Dcaron" => '\u{10e}',
    "Dcroat" => '\u{110}',
    "Delta" => '\u{2206}',
    "E" => '\u{45}',
    "Eacute" => '\u{c9}',
    "Ecaron" => '\u{11a}',
    "Ecircumflex" => '\u{ca}',
    "Edieresis" => '\u{cb}',
    "Egrave" => '\u{c8}',
    "Emacron" => '\u{112}',
    "Eogonek" => '\u{118}',
    "Eth" => '\u{d0}',
    "Euro" => '\u{20ac}',
    "F" => '\u{46}',
    "G" => '\u{47}',
    "Gamma" => '\u{393}',
    "Gbreve" => '\u{11e}',
    "H" => '\u{48}',
    "I" => '\u{49}',
    "Iacute" => '\u{cd}',
    "Icircumflex" => '\u{ce}',
    "Idieresis" => '\u{cf}',
    "Idotaccent" => '\u{130}',
    "Igrave" => '\u{cc}',
    "Imacron" => '\u{12a}',
    "J" => '\u{4a}',
    "K" => '\u{4b}',
    "L" => '\u{4c}',
    "Lacute" => '\u{139}',
    "Lambda" => '\u{39b}',
    "Lcaron" => '\u{13d}',
    "Lslash" => '\u{141}',
    "M" => '\u{4d}',
    "N" => '\u{4e}',
    "Nacute" => '\u{143}',
    "Ncaron" => '\u{147}',
    "Ntilde" => '\u{d1}',
    "O" => '\u{4f}',
    "OE" => '\u{152}',
    "Oacute" => '\u{d3}',
    "Ocircumflex" => '\u{d4}',
    "Odieresis" => '\u{d6}',
    "Ograve" => '\u{d2}',
    "Ohungarumlaut" => '\u{150}',
    "Omacron" => '\u{14c}',
    "Omega" => '\u{2126}',
    "Oslash" => '\u{d8}',
    "Otilde" => '\u{d5}',
    "P" => '\u{50}',
    "Phi" => '\u{3a6}',
    "Pi" => '\u{3a0}',
    "Psi" => '\u{3a8}',
    "Q" => '\u{51}',
    "R" => '\u{52}',
    "Racute" => '\u{154}',
    "Rcaron" => '\u{158}',
    "S" => '\u{53}',
    "Sacute" => '\u{15a}',
    "Scaron" => '\u{160}',
    "Scedilla" => '\u{15e}',
    "Scommaaccent" => '\u{218}',
    "Sigma" => '\u{3a3}',
    "T" => '\u{54}',
    "Tcaron" => '\u{164}',
    "Tcedilla" => '\u{162}',
    "Tcommaaccent" => '\u{21a}',
    "Theta" => '\u{398}',
    "Thorn" => '\u{de}',
    "U" => '\u{55}',
    "Uacute" => '\u{da}',
    "Ucircumflex" => '\u{db}',
    "Udieresis" => '\u{dc}',
    "Ugrave" => '\u{d9}',
    "Uhungarumlaut" => '\u{170}',
    "Umacron" => '\u{16a}',
    "Uring" => '\u{16e}',
    "V" => '\u{56}',
    "W" => '\u{57}',
    "X" => '\u{58}',
    "Xi" => '\u{39e}',
    "Y" => '\u{59}',
    "Yacute" => '\u{dd}',
    "Ydieresis" => '\u{178}',
    "Z" => '\u{5a}',
    "Zacute" => '\u{179}',
    "Zcaron" => '\u{17d}',
    "Zdotaccent" => '\u{17b}',
    "a" => '\u{61}',
    "aacute" => '\u{e1}',
    "abreve" => '\u{103}',
    "acircumflex" => '\u{e2}',
    "acute" => '\u{b4}',
    "adieresis" => '\u{e4}',
    "ae" => '\u{e6}',
    "agrave" => '\u{e0}',
    "alpha" => '\u{3b1}',
    "amacron" => '\u{101}',
    "ampersand" => '\u{26}',
    "aogonek" => '\u{105}',
    "apple" => '\u{f8ff}',
    "approxequal" => '\u{2248}',
    "aring" => '\u{e5}',
    "arrowdown" => '\u{2193}',
    "arrowleft" => '\u{2190}',
    "arrowright" => '\u{2192}',
    "arrowup" => '\u{2191}',
    "asciicircum" => '\u{5e}',
    "asciitilde" => '\u{7e}',
    "asterisk" => '\u{2a}',
    "at" => '\u{40}',
    "atilde" => '\u{e3}',
    "b" => '\u{62}',
    "backslash" => '\u{5c}',
    "bar" => '\u{7c}',
    "beta" => '\u{3b2}',
    "braceleft" => '\u{7b}',
    "braceright" => '\u{7d}',
    "bracketleft" => '\u{5b}',
    "bracketright" => '\u{5d}',
    "breve" => '\u{2d8}',
    "brokenbar" => '\u{a6}',
    "bullet" => '\u{2022}',
    "c" => '\u{63}',
    "cacute" => '\u{107}',
    "caron" => '\u{2c7}',
    "ccaron" => '\u{10d}',
    "ccedilla" => '\u{e7}',
    "cedilla" => '\u{b8}',
    "cent" => '\u{a2}',
    "checkmark" => '\u{2713}',
    "chi" => '\u{3c7}',
    "circumflex" => '\u{2c6}',
    "colon" => '\u{3a}',
    "comma" => '\u{2c}',
    "copyright" => '\u{a9}',
    "currency" => '\u{a4}',
    "d" => '\u{64}',
    "dagger" => '\u{2020}',
    "daggerdbl" => '\u{2021}',
    "dcaron" => '\u{10f}',
    "dcroat" => '\u{111}',
    "degree" => '\u{b0}',
    "delta" => '\u{3b4}',
    "dieresis" => '\u{a8}',
    "divide" => '\u{f7}',
    "dollar" => '\u{24}',
    "dotaccent" => '\u{2d9}',
    "dotlessi" => '\u{131}',
    "dotlessj" => '\u{237}',
    "e" => '\u{65}',
    "eacute" => '\u{e9}',
    "ecaron" => '\u{11b}',
    "ecircumflex" => '\u{ea}',
    "edieresis" => '\u{eb}',
    "egrave" => '\u{e8}',
    "eight" => '\u{38}',
    "ellipsis" => '\u{2026}',
    "emacron" => '\u{113}',
    "emdash" => '\u{2014}',
    "endash" => '\u{2013}',
    "eogonek" => '\u{119}',
    "epsilon" => '\u{3b5}',
    "equal" => '\u{3d}',
    "eta" => '\u{3b7}',
    "eth" => '\u{f0}',
    "exclam" => '\u{21}',
    "exclamdown" => '\u{a1}',
    "f" => '\u{66}',
    "ff" => '\u{fb00}',
    "ffi" => '\u{fb03}',
    "ffl" => '\u{fb04}',
    "fi" => '\u{fb01}',
    "five" => '\u{35}',
    "fl" => '\u{fb02}',
    "florin" => '\u{192}',
    "four" => '\u{34}',
    "fraction" => '\u{2044}',
    "g" => '\u{67}',
    "gamma" => '\u{3b3}',
    "gbreve" => '\u{11f}',
    "germandbls" => '\u{df}',
    "grave" => '\u{60}',
    "greater" => '\u{3e}',
    "greaterequal" => '\u{2265}',
    "guillemotleft" => '\u{ab}',
    "guillemotright" => '\u{bb}',
    "guilsinglleft" => '\u{2039}',
    "guilsinglright" => '\u{203a}',
    "h" => '\u{68}',
    "hungarumlaut" => '\u{2dd}',
    "hyphen" => '\u{2d}',
    "i" => '\u{69}',
    "iacute" => '\u{ed}',
    "icircumflex" => '\u{ee}',
    "idieresis" => '\u{ef}',
    "igrave" => '\u{ec}',
    "imacron" => '\u{12b}',
    "infinity" => '\u{221e}',
    "integral" => '\u{222b}',
    "iota" => '\u{3b9}',
    "j" => '\u{6a}',
    "k" => '\u{6b}',
    "kappa" => '\u{3ba}',
    "l" => '\u{6c}',
    "lacute" => '\u{13a}',
    "lambda" => '\u{3bb}',
    "lcaron" => '\u{13e}',
    "less" => '\u{3c}',
    "lessequal" => '\u{2264}',
    "logicalnot" => '\u{ac}',
    "lozenge" => '\u{25ca}',
    "lslash" => '\u{142}',
    "m" => '\u{6d}',
    "macron" => '\u{af}',
    "minus" => '\u{2212}',
    "mu" => '\u{b5}',
    "multiply" => '\u{d7}',
    "n" => '\u{6e}',
    "nacute" => '\u{144}',
    "nbspace" => '\u{a0}',
    "ncaron" => '\u{148}',
    "nine" => '\u{39}',
    "notequal" => '\u{2260}',
    "ntilde" => '\u{f1}',
    "nu" => '\u{3bd}',
    "numbersign" => '\u{23}',
    "o" => '\u{6f}',
    "oacute" => '\u{f3}',
    "ocircumflex" => '\u{f4}',
    "odieresis" => '\u{f6}',
    "oe" => '\u{153}',
    "ogonek" => '\u{2db}',
    "ograve" => '\u{f2}',
    "ohungarumlaut" => '\u{151}',
    "omacron" => '\u{14d}',
    "omega" => '\u{3c9}',
    "omicron" => '\u{3bf}',
    "one" => '\u{31}',
    "onehalf" => '\u{bd}',
    "onequarter" => '\u{bc}',
    "onesuperior" => '\u{b9}',
    "ordfeminine" => '\u{aa}',
    "ordmasculine" => '\u{ba}',
    "oslash" => '\u{f8}',
    "otilde" => '\u{f5}',
    "p" => '\u{70}',
    "paragraph" => '\u{b6}',
    "parenleft" => '\u{28}',
    "parenright" => '\u{29}',
    "partialdiff" => '\u{2202}',
    "percent" => '\u{25}',
    "period" => '\u{2e}',
    "periodcentered" => '\u{b7}',
    "perthousand" => '\u{2030}',
    "phi" => '\u{3c6}',
    "pi" => '\u{3c0}',
    "plus" => '\u{2b}',
    "plusminus" => '\u{b1}',
    "product" => '\u{220f}',
    "psi" => '\u{3c8}',
    "q" => '\u{71}',
    "question" => '\u{3f}',
    "questiondown" => '\u{bf}',
    "quotedbl" => '\u{22}',
    "quotedblbase" => '\u{201e}',
    "quotedblleft" => '\u{201c}',
    "quotedblright" => '\u{201d}',
    "quoteleft" => '\u{2018}',
    "quoteright" => '\u{2019}',
    "quotesinglbase" => '\u{201a}',
    "quotesingle" => '\u{27}',
    "r" => '\u{72}',
    "racute" => '\u{155}',
    "radical" => '\u{221a}',
    "rcaron" => '\u{159}',
    "registered" => '\u{ae}',
    "rho" => '\u{3c1}',
    "ring" => '\u{2da}',
    "s" => '\u{73}',
    "sacute" => '\u{15b}',
    "scaron" => '\u{161}',
    "scedilla" => '\u{15f}',
    "scommaaccent" => '\u{219}',
    "section" => '\u{a7}',
    "semicolon" => '\u{3b}',
    "seven" => '\u{37}',
    "sfthyphen" => '\u{ad}',
    "sigma" => '\u{3c3}',
    "six" => '\u{36}',
    "slash" => '\u{2f}',
    "space" => '\u{20}',
    "sterling" => '\u{a3}',
    "summation" => '\u{2211}',
    "t" => '\u{74}',
    "tau" => '\u{3c4}',
    "tcaron" => '\u{165}',
    "tcedilla" => '\u{163}',
    "tcommaaccent" => '\u{21b}',
    "theta" => '\u{3b8}',
    "thorn" => '\u{fe}',
    "three" => '\u{33}',
    "threequarters" => '\u{be}',
    "threesuperior" => '\u{b3}',
    "tilde" => '\u{2dc}',
    "trademark" => '\u{2122}',
    "two" => '\u{32}',
    "twosuperior" => '\u{b2}',
    "u" => '\u{75}',
    "uacute" => '\u{fa}',
    "ucircumflex" => '\u{fb}',
    "udieresis" => '\u{fc}',
    "ugrave" => '\u{f9}',
    "uhungarumlaut" => '\u{171}',
    "umacron" => '\u{16b}',
    "underscore" => '\u{5f}',
    "upsilon" => '\u{3c5}',
    "uring" => '\u{16f}',
    "v" => '\u{76}',
    "w" => '\u{77}',
    "x" => '\u{78}',
    "xi" => '\u{3be}',
    "y" => '\u{79}',
    "yacute" => '\u{fd}',
    "ydieresis" => '\u{ff}',
    "yen" => '\u{a5}',
    "z" => '\u{7a}',
    "zacute" => '\u{17a}',
    "zcaron" => '\u{17e}',
    "zdotaccent" => '\u{17c}',
    "zero" => '\u{30}',
    "zeta" => '\u{3b6}',
};
