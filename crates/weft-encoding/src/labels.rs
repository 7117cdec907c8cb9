//! Label table for [get an encoding](https://encoding.spec.whatwg.org/#names-and-labels).

use crate::encoding::Encoding;

/// Every label, lowercased, sorted by byte order for binary search.
pub(crate) static LABELS: &[(&str, Encoding)] = &[
    ("866", Encoding::Ibm866),
    ("ansi_x3.4-1968", Encoding::Windows1252),
    ("arabic", Encoding::Iso8859_6),
    ("ascii", Encoding::Windows1252),
    ("asmo-708", Encoding::Iso8859_6),
    ("big5", Encoding::Big5),
    ("big5-hkscs", Encoding::Big5),
    ("chinese", Encoding::Gbk),
    ("cn-big5", Encoding::Big5),
    ("cp1250", Encoding::Windows1250),
    ("cp1251", Encoding::Windows1251),
    ("cp1252", Encoding::Windows1252),
    ("cp1253", Encoding::Windows1253),
    ("cp1254", Encoding::Windows1254),
    ("cp1255", Encoding::Windows1255),
    ("cp1256", Encoding::Windows1256),
    ("cp1257", Encoding::Windows1257),
    ("cp1258", Encoding::Windows1258),
    ("cp819", Encoding::Windows1252),
    ("cp866", Encoding::Ibm866),
    ("csbig5", Encoding::Big5),
    ("cseuckr", Encoding::EucKr),
    ("cseucpkdfmtjapanese", Encoding::EucJp),
    ("csgb2312", Encoding::Gbk),
    ("csibm866", Encoding::Ibm866),
    ("csiso2022jp", Encoding::Iso2022Jp),
    ("csiso2022kr", Encoding::Replacement),
    ("csiso58gb231280", Encoding::Gbk),
    ("csiso88596e", Encoding::Iso8859_6),
    ("csiso88596i", Encoding::Iso8859_6),
    ("csiso88598e", Encoding::Iso8859_8),
    ("csiso88598i", Encoding::Iso8859_8I),
    ("csisolatin1", Encoding::Windows1252),
    ("csisolatin2", Encoding::Iso8859_2),
    ("csisolatin3", Encoding::Iso8859_3),
    ("csisolatin4", Encoding::Iso8859_4),
    ("csisolatin5", Encoding::Windows1254),
    ("csisolatin6", Encoding::Iso8859_10),
    ("csisolatin9", Encoding::Iso8859_15),
    ("csisolatinarabic", Encoding::Iso8859_6),
    ("csisolatincyrillic", Encoding::Iso8859_5),
    ("csisolatingreek", Encoding::Iso8859_7),
    ("csisolatinhebrew", Encoding::Iso8859_8),
    ("cskoi8r", Encoding::Koi8R),
    ("csksc56011987", Encoding::EucKr),
    ("csmacintosh", Encoding::Macintosh),
    ("csshiftjis", Encoding::ShiftJis),
    ("csunicode", Encoding::Utf16Le),
    ("cyrillic", Encoding::Iso8859_5),
    ("dos-874", Encoding::Windows874),
    ("ecma-114", Encoding::Iso8859_6),
    ("ecma-118", Encoding::Iso8859_7),
    ("elot_928", Encoding::Iso8859_7),
    ("euc-jp", Encoding::EucJp),
    ("euc-kr", Encoding::EucKr),
    ("gb18030", Encoding::Gb18030),
    ("gb2312", Encoding::Gbk),
    ("gb_2312", Encoding::Gbk),
    ("gb_2312-80", Encoding::Gbk),
    ("gbk", Encoding::Gbk),
    ("greek", Encoding::Iso8859_7),
    ("greek8", Encoding::Iso8859_7),
    ("hebrew", Encoding::Iso8859_8),
    ("hz-gb-2312", Encoding::Replacement),
    ("ibm819", Encoding::Windows1252),
    ("ibm866", Encoding::Ibm866),
    ("iso-10646-ucs-2", Encoding::Utf16Le),
    ("iso-2022-cn", Encoding::Replacement),
    ("iso-2022-cn-ext", Encoding::Replacement),
    ("iso-2022-jp", Encoding::Iso2022Jp),
    ("iso-2022-kr", Encoding::Replacement),
    ("iso-8859-1", Encoding::Windows1252),
    ("iso-8859-10", Encoding::Iso8859_10),
    ("iso-8859-11", Encoding::Windows874),
    ("iso-8859-13", Encoding::Iso8859_13),
    ("iso-8859-14", Encoding::Iso8859_14),
    ("iso-8859-15", Encoding::Iso8859_15),
    ("iso-8859-16", Encoding::Iso8859_16),
    ("iso-8859-2", Encoding::Iso8859_2),
    ("iso-8859-3", Encoding::Iso8859_3),
    ("iso-8859-4", Encoding::Iso8859_4),
    ("iso-8859-5", Encoding::Iso8859_5),
    ("iso-8859-6", Encoding::Iso8859_6),
    ("iso-8859-6-e", Encoding::Iso8859_6),
    ("iso-8859-6-i", Encoding::Iso8859_6),
    ("iso-8859-7", Encoding::Iso8859_7),
    ("iso-8859-8", Encoding::Iso8859_8),
    ("iso-8859-8-e", Encoding::Iso8859_8),
    ("iso-8859-8-i", Encoding::Iso8859_8I),
    ("iso-8859-9", Encoding::Windows1254),
    ("iso-ir-100", Encoding::Windows1252),
    ("iso-ir-101", Encoding::Iso8859_2),
    ("iso-ir-109", Encoding::Iso8859_3),
    ("iso-ir-110", Encoding::Iso8859_4),
    ("iso-ir-126", Encoding::Iso8859_7),
    ("iso-ir-127", Encoding::Iso8859_6),
    ("iso-ir-138", Encoding::Iso8859_8),
    ("iso-ir-144", Encoding::Iso8859_5),
    ("iso-ir-148", Encoding::Windows1254),
    ("iso-ir-149", Encoding::EucKr),
    ("iso-ir-157", Encoding::Iso8859_10),
    ("iso-ir-58", Encoding::Gbk),
    ("iso8859-1", Encoding::Windows1252),
    ("iso8859-10", Encoding::Iso8859_10),
    ("iso8859-11", Encoding::Windows874),
    ("iso8859-13", Encoding::Iso8859_13),
    ("iso8859-14", Encoding::Iso8859_14),
    ("iso8859-15", Encoding::Iso8859_15),
    ("iso8859-2", Encoding::Iso8859_2),
    ("iso8859-3", Encoding::Iso8859_3),
    ("iso8859-4", Encoding::Iso8859_4),
    ("iso8859-5", Encoding::Iso8859_5),
    ("iso8859-6", Encoding::Iso8859_6),
    ("iso8859-7", Encoding::Iso8859_7),
    ("iso8859-8", Encoding::Iso8859_8),
    ("iso8859-9", Encoding::Windows1254),
    ("iso88591", Encoding::Windows1252),
    ("iso885910", Encoding::Iso8859_10),
    ("iso885911", Encoding::Windows874),
    ("iso885913", Encoding::Iso8859_13),
    ("iso885914", Encoding::Iso8859_14),
    ("iso885915", Encoding::Iso8859_15),
    ("iso88592", Encoding::Iso8859_2),
    ("iso88593", Encoding::Iso8859_3),
    ("iso88594", Encoding::Iso8859_4),
    ("iso88595", Encoding::Iso8859_5),
    ("iso88596", Encoding::Iso8859_6),
    ("iso88597", Encoding::Iso8859_7),
    ("iso88598", Encoding::Iso8859_8),
    ("iso88599", Encoding::Windows1254),
    ("iso_8859-1", Encoding::Windows1252),
    ("iso_8859-15", Encoding::Iso8859_15),
    ("iso_8859-1:1987", Encoding::Windows1252),
    ("iso_8859-2", Encoding::Iso8859_2),
    ("iso_8859-2:1987", Encoding::Iso8859_2),
    ("iso_8859-3", Encoding::Iso8859_3),
    ("iso_8859-3:1988", Encoding::Iso8859_3),
    ("iso_8859-4", Encoding::Iso8859_4),
    ("iso_8859-4:1988", Encoding::Iso8859_4),
    ("iso_8859-5", Encoding::Iso8859_5),
    ("iso_8859-5:1988", Encoding::Iso8859_5),
    ("iso_8859-6", Encoding::Iso8859_6),
    ("iso_8859-6:1987", Encoding::Iso8859_6),
    ("iso_8859-7", Encoding::Iso8859_7),
    ("iso_8859-7:1987", Encoding::Iso8859_7),
    ("iso_8859-8", Encoding::Iso8859_8),
    ("iso_8859-8:1988", Encoding::Iso8859_8),
    ("iso_8859-9", Encoding::Windows1254),
    ("iso_8859-9:1989", Encoding::Windows1254),
    ("koi", Encoding::Koi8R),
    ("koi8", Encoding::Koi8R),
    ("koi8-r", Encoding::Koi8R),
    ("koi8-ru", Encoding::Koi8U),
    ("koi8-u", Encoding::Koi8U),
    ("koi8_r", Encoding::Koi8R),
    ("korean", Encoding::EucKr),
    ("ks_c_5601-1987", Encoding::EucKr),
    ("ks_c_5601-1989", Encoding::EucKr),
    ("ksc5601", Encoding::EucKr),
    ("ksc_5601", Encoding::EucKr),
    ("l1", Encoding::Windows1252),
    ("l2", Encoding::Iso8859_2),
    ("l3", Encoding::Iso8859_3),
    ("l4", Encoding::Iso8859_4),
    ("l5", Encoding::Windows1254),
    ("l6", Encoding::Iso8859_10),
    ("l9", Encoding::Iso8859_15),
    ("latin1", Encoding::Windows1252),
    ("latin2", Encoding::Iso8859_2),
    ("latin3", Encoding::Iso8859_3),
    ("latin4", Encoding::Iso8859_4),
    ("latin5", Encoding::Windows1254),
    ("latin6", Encoding::Iso8859_10),
    ("logical", Encoding::Iso8859_8I),
    ("mac", Encoding::Macintosh),
    ("macintosh", Encoding::Macintosh),
    ("ms932", Encoding::ShiftJis),
    ("ms_kanji", Encoding::ShiftJis),
    ("replacement", Encoding::Replacement),
    ("shift-jis", Encoding::ShiftJis),
    ("shift_jis", Encoding::ShiftJis),
    ("sjis", Encoding::ShiftJis),
    ("sun_eu_greek", Encoding::Iso8859_7),
    ("tis-620", Encoding::Windows874),
    ("ucs-2", Encoding::Utf16Le),
    ("unicode", Encoding::Utf16Le),
    ("unicode-1-1-utf-8", Encoding::Utf8),
    ("unicode11utf8", Encoding::Utf8),
    ("unicode20utf8", Encoding::Utf8),
    ("unicodefeff", Encoding::Utf16Le),
    ("unicodefffe", Encoding::Utf16Be),
    ("us-ascii", Encoding::Windows1252),
    ("utf-16", Encoding::Utf16Le),
    ("utf-16be", Encoding::Utf16Be),
    ("utf-16le", Encoding::Utf16Le),
    ("utf-8", Encoding::Utf8),
    ("utf8", Encoding::Utf8),
    ("visual", Encoding::Iso8859_8),
    ("windows-1250", Encoding::Windows1250),
    ("windows-1251", Encoding::Windows1251),
    ("windows-1252", Encoding::Windows1252),
    ("windows-1253", Encoding::Windows1253),
    ("windows-1254", Encoding::Windows1254),
    ("windows-1255", Encoding::Windows1255),
    ("windows-1256", Encoding::Windows1256),
    ("windows-1257", Encoding::Windows1257),
    ("windows-1258", Encoding::Windows1258),
    ("windows-31j", Encoding::ShiftJis),
    ("windows-874", Encoding::Windows874),
    ("windows-949", Encoding::EucKr),
    ("x-cp1250", Encoding::Windows1250),
    ("x-cp1251", Encoding::Windows1251),
    ("x-cp1252", Encoding::Windows1252),
    ("x-cp1253", Encoding::Windows1253),
    ("x-cp1254", Encoding::Windows1254),
    ("x-cp1255", Encoding::Windows1255),
    ("x-cp1256", Encoding::Windows1256),
    ("x-cp1257", Encoding::Windows1257),
    ("x-cp1258", Encoding::Windows1258),
    ("x-euc-jp", Encoding::EucJp),
    ("x-gbk", Encoding::Gbk),
    ("x-mac-cyrillic", Encoding::XMacCyrillic),
    ("x-mac-roman", Encoding::Macintosh),
    ("x-mac-ukrainian", Encoding::XMacCyrillic),
    ("x-sjis", Encoding::ShiftJis),
    ("x-unicode20utf8", Encoding::Utf8),
    ("x-user-defined", Encoding::XUserDefined),
    ("x-x-big5", Encoding::Big5),
];
