//! Dictionary keys and well-known name values.

#![allow(missing_docs)]

macro_rules! key {
    ($i:ident, $e:expr) => {
        pub const $i: &[u8] = $e;
    };
}

// A
key!(ALPHA, b"Alpha");
key!(ALTERNATE, b"Alternate");
key!(ANTI_ALIAS, b"AntiAlias");
key!(ART_BOX, b"ArtBox");
key!(ASCII85_DECODE, b"ASCII85Decode");
key!(ASCII85_DECODE_ABBREVIATION, b"A85");
key!(ASCII_HEX_DECODE, b"ASCIIHexDecode");
key!(ASCII_HEX_DECODE_ABBREVIATION, b"AHx");

// B
key!(BACKGROUND, b"Background");
key!(BASE_ENCODING, b"BaseEncoding");
key!(BASE_FONT, b"BaseFont");
key!(BBOX, b"BBox");
key!(BC, b"BC");
key!(BITS_PER_COMPONENT, b"BitsPerComponent");
key!(BITS_PER_COORDINATE, b"BitsPerCoordinate");
key!(BITS_PER_FLAG, b"BitsPerFlag");
key!(BITS_PER_SAMPLE, b"BitsPerSample");
key!(BLACK_POINT, b"BlackPoint");
key!(BLEED_BOX, b"BleedBox");
key!(BM, b"BM");
key!(BOUNDS, b"Bounds");
key!(BPC, b"BPC");

// C
key!(C0, b"C0");
key!(C1, b"C1");
key!(CA, b"CA");
key!(CA_NS, b"ca");
key!(CAL_GRAY, b"CalGray");
key!(CAL_RGB, b"CalRGB");
key!(CATALOG, b"Catalog");
key!(CCITTFAX_DECODE, b"CCITTFaxDecode");
key!(CCITTFAX_DECODE_ABBREVIATION, b"CCF");
key!(CHAR_PROCS, b"CharProcs");
key!(CID_FONT_TYPE0, b"CIDFontType0");
key!(CID_FONT_TYPE2, b"CIDFontType2");
key!(CMAP_NAME, b"CMapName");
key!(CMYK, b"CMYK");
key!(COLORS, b"Colors");
key!(COLOR_SPACE, b"ColorSpace");
key!(COLUMNS, b"Columns");
key!(CONTENTS, b"Contents");
key!(COORDS, b"Coords");
key!(COUNT, b"Count");
key!(CROP_BOX, b"CropBox");
key!(CRYPT, b"Crypt");
key!(CS, b"CS");

// D
key!(D, b"D");
key!(DCT_DECODE, b"DCTDecode");
key!(DCT_DECODE_ABBREVIATION, b"DCT");
key!(DECODE, b"Decode");
key!(DECODE_PARMS, b"DecodeParms");
key!(DEFAULT, b"Default");
key!(DESCENDANT_FONTS, b"DescendantFonts");
key!(DEVICE_CMYK, b"DeviceCMYK");
key!(DEVICE_GRAY, b"DeviceGray");
key!(DEVICE_N, b"DeviceN");
key!(DEVICE_RGB, b"DeviceRGB");
key!(DIFFERENCES, b"Differences");
key!(DOMAIN, b"Domain");
key!(DP, b"DP");
key!(DW, b"DW");
key!(DW2, b"DW2");

// E
key!(EARLY_CHANGE, b"EarlyChange");
key!(ENCODE, b"Encode");
key!(ENCODING, b"Encoding");
key!(ENCRYPT, b"Encrypt");
key!(EXPERT_ENCODING, b"MacExpertEncoding");
key!(EXTEND, b"Extend");
key!(EXT_G_STATE, b"ExtGState");

// F
key!(F, b"F");
key!(FILTER, b"Filter");
key!(FIRST, b"First");
key!(FIRST_CHAR, b"FirstChar");
key!(FL, b"FL");
key!(FLAGS, b"Flags");
key!(FLATE_DECODE, b"FlateDecode");
key!(FLATE_DECODE_ABBREVIATION, b"Fl");
key!(FONT, b"Font");
key!(FONT_DESCRIPTOR, b"FontDescriptor");
key!(FONT_MATRIX, b"FontMatrix");
key!(FORM, b"Form");
key!(FORM_TYPE, b"FormType");
key!(FUNCTION, b"Function");
key!(FUNCTIONS, b"Functions");
key!(FUNCTION_TYPE, b"FunctionType");

// G
key!(G, b"G");
key!(GAMMA, b"Gamma");
key!(GROUP, b"Group");

// H
key!(H, b"H");
key!(HEIGHT, b"Height");

// I
key!(I, b"I");
key!(ICC_BASED, b"ICCBased");
key!(IDENTITY, b"Identity");
key!(IDENTITY_H, b"Identity-H");
key!(IDENTITY_V, b"Identity-V");
key!(IM, b"IM");
key!(IMAGE, b"Image");
key!(IMAGE_MASK, b"ImageMask");
key!(INDEXED, b"Indexed");
key!(INTERPOLATE, b"Interpolate");

// J
key!(JBIG2_DECODE, b"JBIG2Decode");
key!(JPX_DECODE, b"JPXDecode");

// K
key!(K, b"K");
key!(KIDS, b"Kids");

// L
key!(L, b"L");
key!(LAB, b"Lab");
key!(LAST_CHAR, b"LastChar");
key!(LC, b"LC");
key!(LENGTH, b"Length");
key!(LJ, b"LJ");
key!(LUMINOSITY, b"Luminosity");
key!(LW, b"LW");
key!(LZW_DECODE, b"LZWDecode");
key!(LZW_DECODE_ABBREVIATION, b"LZW");

// M
key!(MAC_ROMAN_ENCODING, b"MacRomanEncoding");
key!(MASK, b"Mask");
key!(MATRIX, b"Matrix");
key!(MEDIA_BOX, b"MediaBox");
key!(MISSING_WIDTH, b"MissingWidth");
key!(ML, b"ML");
key!(MM_TYPE1, b"MMType1");

// N
key!(N, b"N");
key!(NONE, b"None");

// O
key!(OBJ_STM, b"ObjStm");
key!(OP, b"OP");
key!(OP_NS, b"op");
key!(OPM, b"OPM");
key!(ORDER, b"Order");

// P
key!(PAGE, b"Page");
key!(PAGES, b"Pages");
key!(PAINT_TYPE, b"PaintType");
key!(PARENT, b"Parent");
key!(PATTERN, b"Pattern");
key!(PATTERN_TYPE, b"PatternType");
key!(PREDICTOR, b"Predictor");
key!(PROPERTIES, b"Properties");
key!(PS, b"PS");

// R
key!(RANGE, b"Range");
key!(RESOURCES, b"Resources");
key!(RGB, b"RGB");
key!(RI, b"RI");
key!(RL, b"RL");
key!(ROOT, b"Root");
key!(ROTATE, b"Rotate");
key!(RUN_LENGTH_DECODE, b"RunLengthDecode");

// S
key!(S, b"S");
key!(SA, b"SA");
key!(SEPARATION, b"Separation");
key!(SHADING, b"Shading");
key!(SHADING_TYPE, b"ShadingType");
key!(SIZE, b"Size");
key!(SMASK, b"SMask");
key!(STANDARD_ENCODING, b"StandardEncoding");
key!(SUBTYPE, b"Subtype");

// T
key!(TILING_TYPE, b"TilingType");
key!(TO_UNICODE, b"ToUnicode");
key!(TR, b"TR");
key!(TR2, b"TR2");
key!(TRANSPARENCY, b"Transparency");
key!(TRIM_BOX, b"TrimBox");
key!(TRUE_TYPE, b"TrueType");
key!(TYPE, b"Type");
key!(TYPE0, b"Type0");
key!(TYPE1, b"Type1");
key!(TYPE3, b"Type3");

// U
key!(USE_CMAP, b"UseCMap");

// V
key!(VERTICES_PER_ROW, b"VerticesPerRow");

// W
key!(W, b"W");
key!(W2, b"W2");
key!(WHITE_POINT, b"WhitePoint");
key!(WIDTH, b"Width");
key!(WIDTHS, b"Widths");
key!(WIN_ANSI_ENCODING, b"WinAnsiEncoding");
key!(WMODE, b"WMode");

// X
key!(XOBJECT, b"XObject");
key!(XREF, b"XRef");
key!(X_STEP, b"XStep");

// Y
key!(Y_STEP, b"YStep");
