use once_cell::sync::Lazy;
use regex::Regex;

//-----------------------------------------------------------------------------
// Legacy file names: benchmark.hfac.heap.buildstring.log.gz
//-----------------------------------------------------------------------------

pub static FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\w+)\.(\d+)\.(\d+)\.([a-zA-Z0-9_\-\.:,]+)\.log\.gz$")
        .expect("valid filename regex")
});

pub static LEADING_DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]").expect("valid digit regex"));

pub static BUILD_KV: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^-]*)-(.*)$").expect("valid build key-value regex"));

//-----------------------------------------------------------------------------
// Log lines
//-----------------------------------------------------------------------------

pub static SCENARIO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^====> Scenario (.*)=(.*)$").expect("valid scenario regex"));

pub static TIMEDRUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^mkdir.*timedrun").expect("valid invocation regex"));

pub static ERROR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        "NullPointerException",
        "|JikesRVM: WARNING: Virtual processor has ignored timer interrupt",
        "|hardware trap",
        "|-- Stack --",
        "|code: -1",
        "|OutOfMemory",
        "|ArrayIndexOutOfBoundsException",
        "|FileNotFoundException",
        "|FAILED warmup",
        "|Validation FAILED",
        "|caught alarm",
    ))
    .expect("valid error regex")
});

pub static TABULATE_BANNER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^=+ Tabulate Statistics =+").expect("valid tabulate banner regex")
});

pub static MMTK_BANNER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^=+ MMTk Statistics Totals =+").expect("valid mmtk banner regex")
});

pub static STARTING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^=====(==)? .* [Ss]tarting").expect("valid starting regex"));

pub static PASSED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"PASSED in (\d+) msec").expect("valid passed regex"));

pub static WARMUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"completed warmup \d* *in (\d+) msec").expect("valid warmup regex")
});

pub static FINISHED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Finished in (\S+) secs").expect("valid finished regex"));

pub static SKIP_FINISHED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_997_|_998_").expect("valid skip regex"));

pub static HEADER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S").expect("valid header regex"));

pub static DATA_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d").expect("valid data regex"));
