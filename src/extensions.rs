//! Recognized filename extensions
//!
//! Compiled-in default set used by the extraction engine to decide whether a
//! `name.ext` token counts as a filename. Membership is a hash-set lookup,
//! never a giant regex alternation.

use ahash::RandomState;
use hashbrown::HashSet;

/// Default recognized extensions: documents, images, code, archives, media
/// and common server-side leftovers worth flagging during recon.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "3g2", "3gp", "7z", "ai", "aif", "apk", "arj", "asp", "aspx", "avi", "bak", "bat", "bin",
    "bmp", "cab", "cda", "cer", "cfg", "cfm", "cgi", "class", "cpl", "cpp", "css", "csv", "cur",
    "dat", "db", "dbf", "deb", "dll", "dmg", "dmp", "doc", "docx", "drv", "email", "eml", "emlx",
    "exe", "flv", "fnt", "fon", "gadget", "gif", "git", "h264", "hta", "htm", "html", "icns",
    "ico", "inc", "ini", "iso", "jar", "java", "jhtml", "jpeg", "jpg", "js", "jsa", "json", "jsp",
    "key", "lnk", "log", "m4v", "mdb", "mid", "mkv", "mov", "mp3", "mp4", "mpa", "mpeg", "mpg",
    "msg", "msi", "nsf", "odp", "ods", "odt", "oft", "ogg", "ost", "otf", "part", "pcap", "pdb",
    "pdf", "phar", "php", "php2", "php3", "php4", "php5", "php6", "php7", "phps", "pht", "phtml",
    "pkg", "pl", "png", "pps", "ppt", "pptx", "ps", "psd", "pst", "py", "rar", "reg", "rm", "rpm",
    "rss", "rtf", "sav", "sh", "shtml", "sql", "svg", "swf", "swift", "sys", "tar", "targz",
    "tex", "tif", "tiff", "tmp", "toast", "ttf", "txt", "vb", "vcd", "vcf", "vob", "wav", "wma",
    "wmv", "wpd", "wpl", "wsf", "xhtml", "xls", "xlsm", "xlsx", "xml", "z", "zip",
];

/// Extension set with O(1) case-normalized membership lookup.
pub type ExtensionSet = HashSet<&'static str, RandomState>;

/// Build the default extension set.
pub fn default_extension_set() -> ExtensionSet {
    DEFAULT_EXTENSIONS.iter().copied().collect()
}

/// Check membership, case-insensitively.
#[inline]
pub fn is_recognized(set: &ExtensionSet, ext: &str) -> bool {
    if set.contains(ext) {
        return true;
    }
    // Only allocate for mixed-case input
    if ext.chars().any(|c| c.is_ascii_uppercase()) {
        return set.contains(ext.to_ascii_lowercase().as_str());
    }
    false
}
