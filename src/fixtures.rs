#[cfg(test)]
pub mod test {
    use std::path::Path;

    use crate::configuration::Configuration;
    use crate::entry::{Entry, SectionDecl};
    use crate::env::MapEnv;
    use crate::interpolate::EnvInterpolation;

    /// Comments in every position the matcher knows about.
    pub const CONFIG1: &str = "\
# Top Comment 1
# Top Comment 2

# Section Comment
[Section.A]
# Single line comment
Option1 = Value1
# Multiline
# comment
Option2: Value2
Option3 = a,
    b,
    c

# End of file comment
";

    /// `CONFIG1` as the writer renders it.
    pub const CONFIG1_WRITTEN: &str = "\
# Top Comment 1
# Top Comment 2

# Section Comment
[Section.A]
# Single line comment
option1 = Value1
# Multiline
# comment
option2 = Value2
option3 = a,
\tb,
\tc

# End of file comment
";

    /// `CONFIG1` after adding a commented section and changing two comments.
    pub const CONFIG1_CHANGED: &str = "\
# Top Comment 1
# Top Comment 2

# New Section Comment
[Section.A]
# Single line comment
option1 = Value1
# New option2 comment
option2 = Value2
option3 = a,
\tb,
\tc

# New Section
[Section.New]
# New value with new comment
new_option = new_value

# End of file comment
";

    /// Server, feature and directory entries, in that order.
    pub fn sample_entries() -> Vec<Entry> {
        let server = SectionDecl::new("Server");
        let dirs = SectionDecl::new("Dirs");
        vec![
            server.option("host", "localhost", "Host to bind to"),
            server.option("port", "8080", "Port to listen on"),
            server.confirm("verbose", false, "Verbose logging?"),
            Entry::multi_select(
                "Features",
                "enabled",
                ["auth", "cache", "metrics"],
                ["auth"],
                "Enabled features",
            )
            .long_instruction("Comma separated list of feature names"),
            dirs.option("root", "/srv/app", "Root directory")
                .instruction("absolute path"),
            dirs.option("data", "${root}/data", "Data directory"),
        ]
    }

    /// Sample entries with `{dir}/app.ini` as primary file and a fixed
    /// environment.
    pub fn sample_configuration(dir: &Path) -> Configuration {
        Configuration::builder()
            .path(dir.join("app.ini"))
            .interpolation(
                EnvInterpolation::new().with_env(MapEnv::new().with("APP_HOME", "/home/app")),
            )
            .entries(sample_entries())
            .build()
    }
}
