// Everything here goes to stderr. stdout (or the output pipe) only carries answers.

#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        if $crate::VERBOSE.load(::std::sync::atomic::Ordering::Relaxed) {
            eprintln!(
                "{} {}",
                console::style("INFO ").for_stderr().on_blue().bright(),
                format!($($arg)+)
            );
        }
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        if $crate::VERBOSE.load(::std::sync::atomic::Ordering::Relaxed) {
            eprintln!(
                "{} {}",
                console::style("DEBUG").for_stderr().dim(),
                format!($($arg)+)
            );
        }
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        eprintln!(
            "{} {}",
            console::style("WARN ").for_stderr().on_yellow().bright(),
            format!($($arg)+)
        );
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        eprintln!(
            "{} {}",
            console::style("ERROR").for_stderr().on_red().bright(),
            format!($($arg)+)
        );
    };
}

/// Print one cause of an error chain, right below an `error!`
#[macro_export]
macro_rules! due_to {
    ($($arg:tt)+) => {
        eprintln!(
            "{} {}",
            console::style("DUE TO").for_stderr().yellow().bold(),
            format!($($arg)+)
        );
    };
}
