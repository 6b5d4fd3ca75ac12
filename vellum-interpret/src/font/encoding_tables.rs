// Code to glyph name tables of the standard Latin encodings.
use phf::phf_map;

/// `StandardEncoding`, the built-in encoding of most Type 1 fonts.
pub(crate) static STANDARD: phf::Map<u8, &'static str> = phf_map! {
    32u8 => "space",
    33u8 => "exclam",
    34u8 => "quotedbl",
    35u8 => "numbersign",
    36u8 => "dollar",
    37u8 => "percent",
    38u8 => "ampersand",
    39u8 => "quoteright",
    40u8 => "parenleft",
    41u8 => "parenright",
    42u8 => "asterisk",
    43u8 => "plus",
    44u8 => "comma",
    45u8 => "hyphen",
    46u8 => "period",
    47u8 => "slash",
    48u8 => "zero",
    49u8 => "one",
    50u8 => "two",
    51u8 => "three",
    52u8 => "four",
    53u8 => "five",
    54u8 => "six",
    55u8 => "seven",
    56u8 => "eight",
    57u8 => "nine",
    58u8 => "colon",
    59u8 => "semicolon",
    60u8 => "less",
    61u8 => "equal",
    62u8 => "greater",
    63u8 => "question",
    64u8 => "at",
    65u8 => "A",
    66u8 => "B",
    67u8 => "C",
    68u8 => "D",
    69u8 => "E",
    70u8 => "F",
    71u8 => "G",
    72u8 => "H",
    73u8 => "I",
    74u8 => "J",
    75u8 => "K",
    76u8 => "L",
    77u8 => "M",
    78u8 => "N",
    79u8 => "O",
    80u8 => "P",
    81u8 => "Q",
    82u8 => "R",
    83u8 => "S",
    84u8 => "T",
    85u8 => "U",
    86u8 => "V",
    87u8 => "W",
    88u8 => "X",
    89u8 => "Y",
    90u8 => "Z",
    91u8 => "bracketleft",
    92u8 => "backslash",
    93u8 => "bracketright",
    94u8 => "asciicircum",
    95u8 => "underscore",
    96u8 => "quoteleft",
    97u8 => "a",
    98u8 => "b",
    99u8 => "c",
    100u8 => "d",
    101u8 => "e",
    102u8 => "f",
    103u8 => "g",
    104u8 => "h",
    105u8 => "i",
    106u8 => "j",
    107u8 => "k",
    108u8 => "l",
    109u8 => "m",
    110u8 => "n",
    111u8 => "o",
    112u8 => "p",
    113u8 => "q",
    114u8 => "r",
    115u8 => "s",
    116u8 => "t",
    117u8 => "u",
    118u8 => "v",
    119u8 => "w",
    120u8 => "x",
    121u8 => "y",
    122u8 => "z",
    123u8 => "braceleft",
    124u8 => "bar",
    125u8 => "braceright",
    126u8 => "asciitilde",
    161u8 => "exclamdown",
    162u8 => "cent",
    163u8 => "sterling",
    164u8 => "fraction",
    165u8 => "yen",
    166u8 => "florin",
    167u8 => "section",
    168u8 => "currency",
    169u8 => "quotesingle",
    170u8 => "quotedblleft",
    171u8 => "guillemotleft",
    172u8 => "guilsinglleft",
    173u8 => "guilsinglright",
    174u8 => "fi",
    175u8 => "fl",
    177u8 => "endash",
    178u8 => "dagger",
    179u8 => "daggerdbl",
    180u8 => "periodcentered",
    182u8 => "paragraph",
    183u8 => "bullet",
    184u8 => "quotesinglbase",
    185u8 => "quotedblbase",
    186u8 => "quotedblright",
    187u8 => "guillemotright",
    188u8 => "ellipsis",
    189u8 => "perthousand",
    191u8 => "questiondown",
    193u8 => "grave",
    194u8 => "acute",
    195u8 => "circumflex",
    196u8 => "tilde",
    197u8 => "macron",
    198u8 => "breve",
    199u8 => "dotaccent",
    200u8 => "dieresis",
    202u8 => "ring",
    203u8 => "cedilla",
    205u8 => "hungarumlaut",
    206u8 => "ogonek",
    207u8 => "caron",
    208u8 => "emdash",
    225u8 => "AE",
    227u8 => "ordfeminine",
    232u8 => "Lslash",
    233u8 => "Oslash",
    234u8 => "OE",
    235u8 => "ordmasculine",
    241u8 => "ae",
    245u8 => "dotlessi",
    248u8 => "lslash",
    249u8 => "oslash",
    250u8 => "oe",
    251u8 => "germandbls",
};

/// `MacRomanEncoding`.
pub(crate) static MAC_ROMAN: phf::Map<u8, &'static str> = phf_map! {
    32u8 => "space",
    33u8 => "exclam",
    34u8 => "quotedbl",
    35u8 => "numbersign",
    36u8 => "dollar",
    37u8 => "percent",
    38u8 => "ampersand",
    39u8 => "quotesingle",
    40u8 => "parenleft",
    41u8 => "parenright",
    42u8 => "asterisk",
    43u8 => "plus",
    44u8 => "comma",
    45u8 => "hyphen",
    46u8 => "period",
    47u8 => "slash",
    48u8 => "zero",
    49u8 => "one",
    50u8 => "two",
    51u8 => "three",
    52u8 => "four",
    53u8 => "five",
    54u8 => "six",
    55u8 => "seven",
    56u8 => "eight",
    57u8 => "nine",
    58u8 => "colon",
    59u8 => "semicolon",
    60u8 => "less",
    61u8 => "equal",
    62u8 => "greater",
    63u8 => "question",
    64u8 => "at",
    65u8 => "A",
    66u8 => "B",
    67u8 => "C",
    68u8 => "D",
    69u8 => "E",
    70u8 => "F",
    71u8 => "G",
    72u8 => "H",
    73u8 => "I",
    74u8 => "J",
    75u8 => "K",
    76u8 => "L",
    77u8 => "M",
    78u8 => "N",
    79u8 => "O",
    80u8 => "P",
    81u8 => "Q",
    82u8 => "R",
    83u8 => "S",
    84u8 => "T",
    85u8 => "U",
    86u8 => "V",
    87u8 => "W",
    88u8 => "X",
    89u8 => "Y",
    90u8 => "Z",
    91u8 => "bracketleft",
    92u8 => "backslash",
    93u8 => "bracketright",
    94u8 => "asciicircum",
    95u8 => "underscore",
    96u8 => "grave",
    97u8 => "a",
    98u8 => "b",
    99u8 => "c",
    100u8 => "d",
    101u8 => "e",
    102u8 => "f",
    103u8 => "g",
    104u8 => "h",
    105u8 => "i",
    106u8 => "j",
    107u8 => "k",
    108u8 => "l",
    109u8 => "m",
    110u8 => "n",
    111u8 => "o",
    112u8 => "p",
    113u8 => "q",
    114u8 => "r",
    115u8 => "s",
    116u8 => "t",
    117u8 => "u",
    118u8 => "v",
    119u8 => "w",
    120u8 => "x",
    121u8 => "y",
    122u8 => "z",
    123u8 => "braceleft",
    124u8 => "bar",
    125u8 => "braceright",
    126u8 => "asciitilde",
    128u8 => "Adieresis",
    129u8 => "Aring",
    130u8 => "Ccedilla",
    131u8 => "Eacute",
    132u8 => "Ntilde",
    133u8 => "Odieresis",
    134u8 => "Udieresis",
    135u8 => "aacute",
    136u8 => "agrave",
    137u8 => "acircumflex",
    138u8 => "adieresis",
    139u8 => "atilde",
    140u8 => "aring",
    141u8 => "ccedilla",
    142u8 => "eacute",
    143u8 => "egrave",
    144u8 => "ecircumflex",
    145u8 => "edieresis",
    146u8 => "iacute",
    147u8 => "igrave",
    148u8 => "icircumflex",
    149u8 => "idieresis",
    150u8 => "ntilde",
    151u8 => "oacute",
    152u8 => "ograve",
    153u8 => "ocircumflex",
    154u8 => "odieresis",
    155u8 => "otilde",
    156u8 => "uacute",
    157u8 => "ugrave",
    158u8 => "ucircumflex",
    159u8 => "udieresis",
    160u8 => "dagger",
    161u8 => "degree",
    162u8 => "cent",
    163u8 => "sterling",
    164u8 => "section",
    165u8 => "bullet",
    166u8 => "paragraph",
    167u8 => "germandbls",
    168u8 => "registered",
    169u8 => "copyright",
    170u8 => "trademark",
    171u8 => "acute",
    172u8 => "dieresis",
    174u8 => "AE",
    175u8 => "Oslash",
    177u8 => "plusminus",
    180u8 => "yen",
    181u8 => "mu",
    187u8 => "ordfeminine",
    188u8 => "ordmasculine",
    190u8 => "ae",
    191u8 => "oslash",
    192u8 => "questiondown",
    193u8 => "exclamdown",
    194u8 => "logicalnot",
    196u8 => "florin",
    199u8 => "guillemotleft",
    200u8 => "guillemotright",
    201u8 => "ellipsis",
    202u8 => "space",
    203u8 => "Agrave",
    204u8 => "Atilde",
    205u8 => "Otilde",
    206u8 => "OE",
    207u8 => "oe",
    208u8 => "endash",
    209u8 => "emdash",
    210u8 => "quotedblleft",
    211u8 => "quotedblright",
    212u8 => "quoteleft",
    213u8 => "quoteright",
    214u8 => "divide",
    216u8 => "ydieresis",
    217u8 => "Ydieresis",
    218u8 => "fraction",
    219u8 => "currency",
    220u8 => "guilsinglleft",
    221u8 => "guilsinglright",
    222u8 => "fi",
    223u8 => "fl",
    224u8 => "daggerdbl",
    225u8 => "periodcentered",
    226u8 => "quotesinglbase",
    227u8 => "quotedblbase",
    228u8 => "perthousand",
    229u8 => "Acircumflex",
    230u8 => "Ecircumflex",
    231u8 => "Aacute",
    232u8 => "Edieresis",
    233u8 => "Egrave",
    234u8 => "Iacute",
    235u8 => "Icircumflex",
    236u8 => "Idieresis",
    237u8 => "Igrave",
    238u8 => "Oacute",
    239u8 => "Ocircumflex",
    241u8 => "Ograve",
    242u8 => "Uacute",
    243u8 => "Ucircumflex",
    244u8 => "Ugrave",
    245u8 => "dotlessi",
    246u8 => "circumflex",
    247u8 => "tilde",
    248u8 => "macron",
    249u8 => "breve",
    250u8 => "dotaccent",
    251u8 => "ring",
    252u8 => "cedilla",
    253u8 => "hungarumlaut",
    254u8 => "ogonek",
    255u8 => "caron",
};

/// `WinAnsiEncoding`.
pub(crate) static WIN_ANSI: phf::Map<u8, &'static str> = phf_map! {
    32u8 => "space",
    33u8 => "exclam",
    34u8 => "quotedbl",
    35u8 => "numbersign",
    36u8 => "dollar",
    37u8 => "percent",
    38u8 => "ampersand",
    39u8 => "quotesingle",
    40u8 => "parenleft",
    41u8 => "parenright",
    42u8 => "asterisk",
    43u8 => "plus",
    44u8 => "comma",
    45u8 => "hyphen",
    46u8 => "period",
    47u8 => "slash",
    48u8 => "zero",
    49u8 => "one",
    50u8 => "two",
    51u8 => "three",
    52u8 => "four",
    53u8 => "five",
    54u8 => "six",
    55u8 => "seven",
    56u8 => "eight",
    57u8 => "nine",
    58u8 => "colon",
    59u8 => "semicolon",
    60u8 => "less",
    61u8 => "equal",
    62u8 => "greater",
    63u8 => "question",
    64u8 => "at",
    65u8 => "A",
    66u8 => "B",
    67u8 => "C",
    68u8 => "D",
    69u8 => "E",
    70u8 => "F",
    71u8 => "G",
    72u8 => "H",
    73u8 => "I",
    74u8 => "J",
    75u8 => "K",
    76u8 => "L",
    77u8 => "M",
    78u8 => "N",
    79u8 => "O",
    80u8 => "P",
    81u8 => "Q",
    82u8 => "R",
    83u8 => "S",
    84u8 => "T",
    85u8 => "U",
    86u8 => "V",
    87u8 => "W",
    88u8 => "X",
    89u8 => "Y",
    90u8 => "Z",
    91u8 => "bracketleft",
    92u8 => "backslash",
    93u8 => "bracketright",
    94u8 => "asciicircum",
    95u8 => "underscore",
    96u8 => "grave",
    97u8 => "a",
    98u8 => "b",
    99u8 => "c",
    100u8 => "d",
    101u8 => "e",
    102u8 => "f",
    103u8 => "g",
    104u8 => "h",
    105u8 => "i",
    106u8 => "j",
    107u8 => "k",
    108u8 => "l",
    109u8 => "m",
    110u8 => "n",
    111u8 => "o",
    112u8 => "p",
    113u8 => "q",
    114u8 => "r",
    115u8 => "s",
    116u8 => "t",
    117u8 => "u",
    118u8 => "v",
    119u8 => "w",
    120u8 => "x",
    121u8 => "y",
    122u8 => "z",
    123u8 => "braceleft",
    124u8 => "bar",
    125u8 => "braceright",
    126u8 => "asciitilde",
    128u8 => "Euro",
    130u8 => "quotesinglbase",
    131u8 => "florin",
    132u8 => "quotedblbase",
    133u8 => "ellipsis",
    134u8 => "dagger",
    135u8 => "daggerdbl",
    136u8 => "circumflex",
    137u8 => "perthousand",
    138u8 => "Scaron",
    139u8 => "guilsinglleft",
    140u8 => "OE",
    142u8 => "Zcaron",
    145u8 => "quoteleft",
    146u8 => "quoteright",
    147u8 => "quotedblleft",
    148u8 => "quotedblright",
    149u8 => "bullet",
    150u8 => "endash",
    151u8 => "emdash",
    152u8 => "tilde",
    153u8 => "trademark",
    154u8 => "scaron",
    155u8 => "guilsinglright",
    156u8 => "oe",
    158u8 => "zcaron",
    159u8 => "Ydieresis",
    160u8 => "space",
    161u8 => "exclamdown",
    162u8 => "cent",
    163u8 => "sterling",
    164u8 => "currency",
    165u8 => "yen",
    166u8 => "brokenbar",
    167u8 => "section",
    168u8 => "dieresis",
    169u8 => "copyright",
    170u8 => "ordfeminine",
    171u8 => "guillemotleft",
    172u8 => "logicalnot",
    173u8 => "space",
    174u8 => "registered",
    175u8 => "macron",
    176u8 => "degree",
    177u8 => "plusminus",
    178u8 => "twosuperior",
    179u8 => "threesuperior",
    180u8 => "acute",
    181u8 => "mu",
    182u8 => "paragraph",
    183u8 => "periodcentered",
    184u8 => "cedilla",
    185u8 => "onesuperior",
    186u8 => "ordmasculine",
    187u8 => "guillemotright",
    188u8 => "onequarter",
    189u8 => "onehalf",
    190u8 => "threequarters",
    191u8 => "questiondown",
    192u8 => "Agrave",
    193u8 => "Aacute",
    194u8 => "Acircumflex",
    195u8 => "Atilde",
    196u8 => "Adieresis",
    197u8 => "Aring",
    198u8 => "AE",
    199u8 => "Ccedilla",
    200u8 => "Egrave",
    201u8 => "Eacute",
    202u8 => "Ecircumflex",
    203u8 => "Edieresis",
    204u8 => "Igrave",
    205u8 => "Iacute",
    206u8 => "Icircumflex",
    207u8 => "Idieresis",
    208u8 => "Eth",
    209u8 => "Ntilde",
    210u8 => "Ograve",
    211u8 => "Oacute",
    212u8 => "Ocircumflex",
    213u8 => "Otilde",
    214u8 => "Odieresis",
    215u8 => "multiply",
    216u8 => "Oslash",
    217u8 => "Ugrave",
    218u8 => "Uacute",
    219u8 => "Ucircumflex",
    220u8 => "Udieresis",
    221u8 => "Yacute",
    222u8 => "Thorn",
    223u8 => "germandbls",
    224u8 => "agrave",
    225u8 => "aacute",
    226u8 => "acircumflex",
    227u8 => "atilde",
    228u8 => "adieresis",
    229u8 => "aring",
    230u8 => "ae",
    231u8 => "ccedilla",
    232u8 => "egrave",
    233u8 => "eacute",
    234u8 => "ecircumflex",
    235u8 => "edieresis",
    236u8 => "igrave",
    237u8 => "iacute",
    238u8 => "icircumflex",
    239u8 => "idieresis",
    240u8 => "eth",
    241u8 => "ntilde",
    242u8 => "ograve",
    243u8 => "oacute",
    244u8 => "ocircumflex",
    245u8 => "otilde",
    246u8 => "odieresis",
    247u8 => "divide",
    248u8 => "oslash",
    249u8 => "ugrave",
    250u8 => "uacute",
    251u8 => "ucircumflex",
    252u8 => "udieresis",
    253u8 => "yacute",
    254u8 => "thorn",
    255u8 => "ydieresis",
};
