use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PythonVersion {
    pub major: u8,
    pub minor: u8,
}

impl PythonVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

pub const DEFAULT_VERSION: PythonVersion = PythonVersion::new(3, 5);

/// Versions with a vendored module table.
pub const SUPPORTED_VERSIONS: &[PythonVersion] = &[
    PythonVersion::new(2, 6),
    PythonVersion::new(2, 7),
    PythonVersion::new(3, 2),
    PythonVersion::new(3, 3),
    PythonVersion::new(3, 4),
    PythonVersion::new(3, 5),
    PythonVersion::new(3, 6),
    PythonVersion::new(3, 7),
    PythonVersion::new(3, 8),
    PythonVersion::new(3, 9),
    PythonVersion::new(3, 10),
    PythonVersion::new(3, 11),
    PythonVersion::new(3, 12),
];

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StdlibVersionError {
    #[error("invalid python version '{0}', expected MAJOR.MINOR")]
    Malformed(String),
    #[error("no standard library table for python {0} (supported: {supported})", supported = supported_list())]
    Unsupported(PythonVersion),
}

fn supported_list() -> String {
    SUPPORTED_VERSIONS
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl FromStr for PythonVersion {
    type Err = StdlibVersionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || StdlibVersionError::Malformed(raw.to_string());
        let (major, minor) = raw.trim().split_once('.').ok_or_else(malformed)?;
        let version = PythonVersion::new(
            major.parse().map_err(|_| malformed())?,
            minor.parse().map_err(|_| malformed())?,
        );
        if SUPPORTED_VERSIONS.contains(&version) {
            Ok(version)
        } else {
            Err(StdlibVersionError::Unsupported(version))
        }
    }
}

struct Entry {
    name: &'static str,
    since: PythonVersion,
    until: Option<PythonVersion>,
}

const V2_6: PythonVersion = PythonVersion::new(2, 6);
const V3_0: PythonVersion = PythonVersion::new(3, 0);

const fn all(name: &'static str) -> Entry {
    Entry {
        name,
        since: V2_6,
        until: None,
    }
}

const fn since(name: &'static str, major: u8, minor: u8) -> Entry {
    Entry {
        name,
        since: PythonVersion::new(major, minor),
        until: None,
    }
}

// `until` is the first version without the module.
const fn until(name: &'static str, major: u8, minor: u8) -> Entry {
    Entry {
        name,
        since: V2_6,
        until: Some(PythonVersion::new(major, minor)),
    }
}

const fn py2(name: &'static str) -> Entry {
    Entry {
        name,
        since: V2_6,
        until: Some(V3_0),
    }
}

const fn py2_since(name: &'static str, minor: u8) -> Entry {
    Entry {
        name,
        since: PythonVersion::new(2, minor),
        until: Some(V3_0),
    }
}

impl Entry {
    fn applies(&self, version: PythonVersion) -> bool {
        version >= self.since && self.until.is_none_or(|until| version < until)
    }
}

static MODULES: &[Entry] = &[
    all("__future__"),
    all("__main__"),
    all("_ast"),
    all("abc"),
    all("aifc"),
    since("antigravity", 2, 7),
    since("argparse", 2, 7),
    all("array"),
    all("ast"),
    until("asynchat", 3, 12),
    since("asyncio", 3, 4),
    until("asyncore", 3, 12),
    all("atexit"),
    all("audioop"),
    all("base64"),
    all("bdb"),
    all("binascii"),
    until("binhex", 3, 11),
    all("bisect"),
    since("builtins", 3, 0),
    all("bz2"),
    all("cProfile"),
    all("calendar"),
    all("cgi"),
    all("cgitb"),
    all("chunk"),
    all("cmath"),
    all("cmd"),
    all("code"),
    all("codecs"),
    all("codeop"),
    all("collections"),
    all("colorsys"),
    all("compileall"),
    since("concurrent", 3, 2),
    since("configparser", 3, 0),
    all("contextlib"),
    since("contextvars", 3, 7),
    all("copy"),
    since("copyreg", 3, 0),
    all("crypt"),
    all("csv"),
    all("ctypes"),
    all("curses"),
    since("dataclasses", 3, 7),
    all("datetime"),
    all("dbm"),
    all("decimal"),
    all("difflib"),
    all("dis"),
    until("distutils", 3, 12),
    all("doctest"),
    until("dummy_threading", 3, 9),
    all("email"),
    all("encodings"),
    py2_since("ensurepip", 7),
    since("ensurepip", 3, 4),
    since("enum", 3, 4),
    all("errno"),
    since("faulthandler", 3, 3),
    all("fcntl"),
    all("filecmp"),
    all("fileinput"),
    all("fnmatch"),
    until("formatter", 3, 10),
    all("fractions"),
    all("ftplib"),
    all("functools"),
    all("gc"),
    all("genericpath"),
    all("getopt"),
    all("getpass"),
    all("gettext"),
    all("glob"),
    since("graphlib", 3, 9),
    all("grp"),
    all("gzip"),
    all("hashlib"),
    all("heapq"),
    all("hmac"),
    since("html", 3, 0),
    since("http", 3, 0),
    all("idlelib"),
    all("imaplib"),
    all("imghdr"),
    until("imp", 3, 12),
    since("importlib", 2, 7),
    all("inspect"),
    all("io"),
    since("ipaddress", 3, 3),
    all("itertools"),
    all("json"),
    all("keyword"),
    all("lib2to3"),
    all("linecache"),
    all("locale"),
    all("logging"),
    since("lzma", 3, 3),
    until("macpath", 3, 8),
    all("mailbox"),
    all("mailcap"),
    all("marshal"),
    all("math"),
    all("mimetypes"),
    all("mmap"),
    all("modulefinder"),
    all("msilib"),
    all("msvcrt"),
    all("multiprocessing"),
    all("netrc"),
    all("nis"),
    all("nntplib"),
    all("nt"),
    all("ntpath"),
    all("nturl2path"),
    all("numbers"),
    all("opcode"),
    all("operator"),
    all("optparse"),
    all("os"),
    all("ossaudiodev"),
    until("parser", 3, 10),
    since("pathlib", 3, 4),
    all("pdb"),
    all("pickle"),
    all("pickletools"),
    all("pipes"),
    all("pkgutil"),
    all("platform"),
    all("plistlib"),
    all("poplib"),
    all("posix"),
    all("posixpath"),
    all("pprint"),
    all("profile"),
    all("pstats"),
    all("pty"),
    all("pwd"),
    all("py_compile"),
    all("pyclbr"),
    all("pydoc"),
    since("pydoc_data", 2, 7),
    all("pyexpat"),
    since("queue", 3, 0),
    all("quopri"),
    all("random"),
    all("re"),
    all("readline"),
    since("reprlib", 3, 0),
    all("resource"),
    all("rlcompleter"),
    all("runpy"),
    all("sched"),
    since("secrets", 3, 6),
    all("select"),
    since("selectors", 3, 4),
    all("shelve"),
    all("shlex"),
    all("shutil"),
    all("signal"),
    all("site"),
    until("smtpd", 3, 12),
    all("smtplib"),
    all("sndhdr"),
    all("socket"),
    since("socketserver", 3, 0),
    all("spwd"),
    all("sqlite3"),
    all("sre_compile"),
    all("sre_constants"),
    all("sre_parse"),
    all("ssl"),
    all("stat"),
    since("statistics", 3, 4),
    all("string"),
    all("stringprep"),
    all("struct"),
    all("subprocess"),
    all("sunau"),
    until("symbol", 3, 10),
    all("symtable"),
    all("sys"),
    since("sysconfig", 2, 7),
    all("syslog"),
    all("tabnanny"),
    all("tarfile"),
    all("telnetlib"),
    all("tempfile"),
    all("termios"),
    all("test"),
    all("textwrap"),
    all("this"),
    all("threading"),
    all("time"),
    all("timeit"),
    since("tkinter", 3, 0),
    all("token"),
    all("tokenize"),
    since("tomllib", 3, 11),
    all("trace"),
    all("traceback"),
    since("tracemalloc", 3, 4),
    all("tty"),
    all("turtle"),
    since("turtledemo", 3, 2),
    all("types"),
    since("typing", 3, 5),
    all("unicodedata"),
    all("unittest"),
    all("urllib"),
    all("uu"),
    all("uuid"),
    since("venv", 3, 3),
    all("warnings"),
    all("wave"),
    all("weakref"),
    all("webbrowser"),
    since("winreg", 3, 0),
    all("winsound"),
    all("wsgiref"),
    all("xdrlib"),
    all("xml"),
    since("xmlrpc", 3, 0),
    since("zipapp", 3, 5),
    all("zipfile"),
    all("zipimport"),
    all("zlib"),
    since("zoneinfo", 3, 9),
    since("_thread", 3, 0),
    py2("BaseHTTPServer"),
    py2("Bastion"),
    py2("CGIHTTPServer"),
    py2("ConfigParser"),
    py2("Cookie"),
    py2("DocXMLRPCServer"),
    py2("HTMLParser"),
    py2("MimeWriter"),
    py2("Queue"),
    py2("ScrolledText"),
    py2("SimpleHTTPServer"),
    py2("SimpleXMLRPCServer"),
    py2("SocketServer"),
    py2("StringIO"),
    py2("Tix"),
    py2("Tkconstants"),
    py2("Tkdnd"),
    py2("Tkinter"),
    py2("UserDict"),
    py2("UserList"),
    py2("UserString"),
    py2("__builtin__"),
    py2("_winreg"),
    py2("anydbm"),
    py2("audiodev"),
    py2("bsddb"),
    py2("cPickle"),
    py2("cStringIO"),
    py2("commands"),
    py2("compiler"),
    py2("cookielib"),
    py2("copy_reg"),
    py2("dbhash"),
    py2("dircache"),
    py2("dumbdbm"),
    py2("dummy_thread"),
    py2("exceptions"),
    py2("fpformat"),
    py2("future_builtins"),
    py2("gdbm"),
    py2("htmlentitydefs"),
    py2("htmllib"),
    py2("httplib"),
    py2("ihooks"),
    py2("imageop"),
    py2("imputil"),
    py2("md5"),
    py2("mhlib"),
    py2("mimetools"),
    py2("mimify"),
    py2("multifile"),
    py2("mutex"),
    py2("new"),
    py2("popen2"),
    py2("posixfile"),
    py2("repr"),
    py2("rexec"),
    py2("rfc822"),
    py2("robotparser"),
    py2("sets"),
    py2("sgmllib"),
    py2("sha"),
    py2("statvfs"),
    py2("sunaudio"),
    py2("thread"),
    py2("tkColorChooser"),
    py2("tkCommonDialog"),
    py2("tkFileDialog"),
    py2("tkFont"),
    py2("tkMessageBox"),
    py2("tkSimpleDialog"),
    py2("toaiff"),
    py2_since("ttk", 7),
    py2("urllib2"),
    py2("urlparse"),
    py2("user"),
    py2("whichdb"),
    py2("xmlrpclib"),
];

/// Top-level standard-library module names for one Python version.
#[derive(Debug, Clone, Default)]
pub struct StdlibModules {
    names: HashSet<&'static str>,
}

impl StdlibModules {
    pub fn for_version(version: PythonVersion) -> Self {
        let names = MODULES
            .iter()
            .filter(|entry| entry.applies(version))
            .map(|entry| entry.name)
            .collect();
        Self { names }
    }

    /// Used when standard-library filtering is turned off.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A dotted name is a standard-library module when its top-level
    /// package is one (`os.path`, `xml.etree.ElementTree`).
    pub fn contains(&self, name: &str) -> bool {
        let top = name.split('.').next().unwrap_or_default();
        self.names.contains(top)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
