use std::{error::Error, fs, path::Path, sync::Arc};

use exb_config::Catalog;
use exb_export::Exporters;
use exb_harness::{ExportBuildTest, HarnessOptions, Progress, TestProgram, test_matrix};
use ntest::timeout;

const CATALOG: &str = r#"
    [global]
    version = "1.0.0"

    [[releases]]
    version = "2"

    [[targets]]
    name = "K64F"
    supported_toolchains = ["GCC_ARM"]
    release_versions = ["2"]

    [[compilers]]
    name = "GCC_ARM"
    cc = ["arm-none-eabi-gcc", "-c"]
    cppc = ["arm-none-eabi-g++", "-c"]
    asm = ["arm-none-eabi-gcc", "-c"]
    ld = ["arm-none-eabi-gcc"]
    elf2bin = "arm-none-eabi-objcopy"
    linker_ext = ".ld"

    [[ides]]
    id = "shell"
    toolchain = "GCC_ARM"
    kind = "command"
    project_file = "{name}.json"
    build_command = ["sh", "-c", "test -f {project} && test -f main.cpp"]

    [[ides]]
    id = "make_iar"
    toolchain = "IAR"
    kind = "makefile"

    [[programs]]
    id = 0
    name = "MBED_BLINKY"
    source_dirs = ["blinky"]
"#;

fn sdk_root(root: &Path) -> Result<(), Box<dyn Error + Send + Sync>> {
    let blinky = root.join("blinky");
    fs::create_dir_all(&blinky)?;
    fs::write(blinky.join("main.cpp"), "int main() { return 0; }\n")?;
    fs::write(blinky.join("K64F.ld"), "/* linker script */\n")?;
    Ok(())
}

#[test]
#[timeout(30000)]
fn test_catalog_exporters_end_to_end() -> Result<(), Box<dyn Error + Send + Sync>> {
    let root = tempfile::tempdir()?;
    sdk_root(root.path())?;
    let catalog = Arc::new(Catalog::from_toml(CATALOG)?);
    let program = TestProgram::classic(catalog.program(0).ok_or("missing program")?);
    let tests = test_matrix(
        &[String::from("K64F")],
        &[String::from("shell"), String::from("make_iar")],
        &[program],
        &catalog,
    );

    let export_root = root.path().join("BUILD/export");
    let mut harness = ExportBuildTest::new(
        Exporters::new(Arc::clone(&catalog), root.path()),
        tests,
        HarnessOptions {
            export_root: export_root.clone(),
            jobs: 2,
            ..HarnessOptions::default()
        },
        Arc::new(Progress::sink()),
    );

    let results = harness.batch_tests()?;
    assert_eq!(results.successes, vec!["K64F::shell\tMBED_BLINKY"]);
    assert_eq!(results.skips, vec!["K64F::make_iar\tMBED_BLINKY"]);
    assert!(results.failures.is_empty());

    assert!(export_root.join("K64F_shell_MBED_BLINKY/MBED_BLINKY.json").exists());
    assert!(export_root.join("K64F_shell_MBED_BLINKY_log.txt").exists());
    assert!(!export_root.join("K64F_make_iar_MBED_BLINKY").exists());
    Ok(())
}

#[test]
#[timeout(30000)]
fn test_exports_inside_sdk_root_do_not_nest() -> Result<(), Box<dyn Error + Send + Sync>> {
    let root = tempfile::tempdir()?;
    fs::write(root.path().join("main.cpp"), "int main() { return 0; }\n")?;
    for case in ["a", "b"] {
        let dir = root.path().join("TESTS/g").join(case);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("test.cpp"), "void test() {}\n")?;
    }
    let catalog = Arc::new(Catalog::from_toml(CATALOG)?);
    let programs: Vec<_> = ["a", "b"]
        .into_iter()
        .map(|case| {
            TestProgram::os_test(
                format!("tests-g-{case}"),
                &root.path().join("TESTS/g").join(case),
                root.path(),
            )
        })
        .collect();
    let tests = test_matrix(&[String::from("K64F")], &[String::from("shell")], &programs, &catalog);

    let export_root = root.path().join("out");
    let mut harness = ExportBuildTest::new(
        Exporters::new(Arc::clone(&catalog), root.path()),
        tests,
        HarnessOptions {
            export_root: export_root.clone(),
            jobs: 1,
            ..HarnessOptions::default()
        },
        Arc::new(Progress::sink()),
    );

    let results = harness.batch_tests()?;
    assert_eq!(results.successes.len(), 2);
    for (case, other) in [("a", "b"), ("b", "a")] {
        let export_dir = export_root.join(format!("K64F_shell_tests-g-{case}"));
        assert!(export_dir.join("test.cpp").exists());
        assert!(!export_dir.join("out").exists());
        assert!(!export_dir.join(format!("tests-g-{other}.json")).exists());
    }
    Ok(())
}
