pub mod compute;
pub mod export;
pub mod inspect;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::fs;
    use std::path::{Path, PathBuf};

    pub const TRAJECTORY: &str = "\
MODEL        1
ATOM      1  N   GLY A   1      10.000  10.000  10.000  1.00  0.00           N
ATOM      2  CA  GLY A   1      11.000  10.000  10.000  1.00  0.00           C
ATOM      3  ZN  ZN  B   2      30.000  30.000  30.000  1.00  0.00          ZN
ENDMDL
MODEL        2
ATOM      1  N   GLY A   1      10.000  10.000  10.000  1.00  0.00           N
ATOM      2  CA  GLY A   1      10.000  11.000  10.000  1.00  0.00           C
ATOM      3  ZN  ZN  B   2      30.000  30.000  30.000  1.00  0.00          ZN
ENDMDL
MODEL        3
ATOM      1  N   GLY A   1      20.000  20.000  20.000  1.00  0.00           N
ATOM      2  CA  GLY A   1      21.000  20.000  20.000  1.00  0.00           C
ATOM      3  ZN  ZN  B   2      30.000  30.000  30.000  1.00  0.00          ZN
ENDMDL
END
";

    pub const SITES: &str = r#"
[fingerprint]
tasks = 2

[[site]]
center = [10.0, 10.0, 10.0]
radius = 2.0
spacing = [1.0, 1.0, 1.0]

[[site]]
center = [30.0, 30.0, 30.0]
radius = 1.0
spacing = [0.5, 0.5, 0.5]
"#;

    pub fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }
}
