//! Test selection and the test run.
//!
//! Validates the command line against the catalog, builds the test matrix
//! and runs it through the harness.

use std::{
    collections::{BTreeMap, HashSet},
    hash::Hash,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use exb_config::{Catalog, discover_os_tests};
use exb_export::Exporters;
use exb_harness::{
    ExportBuildTest, HarnessOptions, Progress, TestCase, TestProgram, test_matrix,
};
use tracing::{info, warn};

use crate::cli::Cli;
use crate::prelude::*;

/// Release whose test programs come from the catalog. Later releases use the
/// OS tests found below `TESTS`.
pub const CLASSIC_RELEASE: &str = "2";

/// Program exported for the classic release when none is selected.
pub const DEFAULT_PROGRAM: &str = "MBED_BLINKY";

/// OS test exported for newer releases when none is selected.
pub const DEFAULT_OS_TEST: &str = "tests-mbedmicro-rtos-mbed-basic";

fn invalid_choice<'a>(
    kind: &str,
    value: impl std::fmt::Display,
    choices: impl IntoIterator<Item = &'a str>,
) -> Error {
    let choices: Vec<_> = choices.into_iter().collect();
    Error::Selection(format!(
        "invalid {kind} '{value}' (choose from {})",
        choices.join(", ")
    ))
}

/// Drop repeated selections, keeping the first occurrence of each.
fn unique<T: Clone + Eq + Hash>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn select_ides(cli: &Cli, catalog: &Catalog) -> Result<Vec<String>> {
    let known = catalog.ide_ids();
    let ides = cli
        .ides
        .iter()
        .map(|ide| {
            let ide = ide.to_lowercase();
            if known.contains(&ide.as_str()) {
                Ok(ide)
            } else {
                Err(invalid_choice("IDE", &ide, known.iter().copied()))
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(unique(ides))
}

fn select_targets(cli: &Cli, catalog: &Catalog, release: &str) -> Result<Vec<String>> {
    let available: Vec<&str> = catalog
        .targets_in_release(release)
        .into_iter()
        .map(|target| target.name.as_str())
        .collect();
    if cli.mcu.is_empty() {
        return Ok(available.into_iter().map(String::from).collect());
    }

    let targets = cli
        .mcu
        .iter()
        .map(|mcu| {
            let mcu = mcu.to_uppercase();
            if available.contains(&mcu.as_str()) {
                Ok(mcu)
            } else {
                Err(invalid_choice("target", &mcu, available.iter().copied()))
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(unique(targets))
}

fn select_programs(cli: &Cli, catalog: &Catalog) -> Result<Vec<TestProgram>> {
    let names = || catalog.programs.iter().map(|program| program.name.as_str());
    let mut programs = Vec::new();

    for id in &cli.program_ids {
        let program = catalog.program(*id).ok_or_else(|| {
            Error::Selection(format!(
                "invalid program index {id} (choose from 0 to {})",
                catalog.programs.len().saturating_sub(1)
            ))
        })?;
        programs.push(TestProgram::classic(program));
    }
    for name in &cli.program_names {
        let program = catalog
            .program_by_name(name)
            .ok_or_else(|| invalid_choice("program", name, names()))?;
        programs.push(TestProgram::classic(program));
    }

    if programs.is_empty() {
        let program = catalog
            .program_by_name(DEFAULT_PROGRAM)
            .ok_or_else(|| invalid_choice("program", DEFAULT_PROGRAM, names()))?;
        programs.push(TestProgram::classic(program));
    }
    Ok(unique(programs))
}

fn select_os_tests(
    cli: &Cli,
    tests: &BTreeMap<String, PathBuf>,
    root: &Path,
) -> Result<Vec<TestProgram>> {
    let requested = if cli.os_tests.is_empty() {
        vec![DEFAULT_OS_TEST.to_string()]
    } else {
        cli.os_tests.clone()
    };
    let programs = requested
        .iter()
        .map(|name| {
            tests
                .get(name)
                .map(|dir| TestProgram::os_test(name.as_str(), dir, root))
                .ok_or_else(|| {
                    invalid_choice("OS test", name, tests.keys().map(String::as_str))
                })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(unique(programs))
}

/// Validate the command line selection and build the test matrix.
pub fn select_tests(cli: &Cli, catalog: &Catalog) -> Result<Vec<TestCase>> {
    let release = match &cli.release {
        Some(version) => catalog.release(version).map_err(|_| {
            invalid_choice("release", version, catalog.release_versions())
        })?,
        None => catalog.latest_release()?,
    };
    info!("Testing release {}", release.version);

    let ides = select_ides(cli, catalog)?;
    let targets = select_targets(cli, catalog, &release.version)?;

    let programs = if release.version == CLASSIC_RELEASE {
        if !cli.os_tests.is_empty() {
            warn!("--os-tests is ignored for release {}", CLASSIC_RELEASE);
        }
        select_programs(cli, catalog)?
    } else {
        if !cli.program_ids.is_empty() || !cli.program_names.is_empty() {
            warn!("Program selection is ignored for release {}", release.version);
        }
        let tests_root = match &catalog.global.tests_root {
            Some(tests_root) => cli.root.join(tests_root),
            None => cli.root.clone(),
        };
        let tests = discover_os_tests(&tests_root)?;
        select_os_tests(cli, &tests, &cli.root)?
    };

    Ok(test_matrix(&targets, &ides, &programs, catalog))
}

/// Run the selected tests and print the results.
///
/// Returns the process exit code: the number of failed builds.
pub fn handle_run(cli: Cli) -> Result<ExitCode> {
    let catalog = Arc::new(Catalog::from_file(&cli.catalog)?);
    let tests = select_tests(&cli, &catalog)?;
    info!("{} test cases selected", tests.len());

    let options = HarnessOptions {
        export_root: cli.export_dir,
        clean: cli.clean,
        profiles: cli.profiles,
        jobs: cli.jobs,
    };
    let mut harness = ExportBuildTest::new(
        Exporters::new(catalog, cli.root),
        tests,
        options,
        Arc::new(Progress::stdout()),
    );

    let results = harness.batch_tests()?;
    results.print(std::io::stdout().lock())?;
    Ok(ExitCode::from(results.exit_code()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;

    use super::*;

    const CATALOG: &str = r#"
        [global]
        version = "1.0.0"
        tests_root = "sdk"

        [[releases]]
        version = "2"

        [[releases]]
        version = "5"

        [[targets]]
        name = "K64F"
        supported_toolchains = ["GCC_ARM", "ARM", "IAR"]
        release_versions = ["2", "5"]

        [[targets]]
        name = "LPC1768"
        supported_toolchains = ["GCC_ARM", "ARM"]
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
        id = "make_gcc_arm"
        toolchain = "GCC_ARM"
        kind = "makefile"

        [[ides]]
        id = "uvision"
        toolchain = "ARM"
        kind = "command"
        project_file = "{name}.uvprojx"
        build_command = ["UV4", "-b", "{project}"]
        log = "build/build_log.txt"

        [[programs]]
        id = 0
        name = "MBED_BLINKY"
        source_dirs = ["blinky"]

        [[programs]]
        id = 1
        name = "MBED_10"
        source_dirs = ["mbed_10"]
    "#;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["exbt", "--catalog", "catalog.toml"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    fn catalog() -> Catalog {
        Catalog::from_toml(CATALOG).expect("Invalid test catalog")
    }

    #[test]
    fn classic_release_defaults() -> Result<()> {
        let tests = select_tests(&cli(&["--release", "2", "-i", "make_gcc_arm"]), &catalog())?;
        let descriptors: Vec<_> = tests.iter().map(TestCase::descriptor).collect();
        assert_eq!(
            descriptors,
            vec!["K64F::make_gcc_arm\tMBED_BLINKY", "LPC1768::make_gcc_arm\tMBED_BLINKY"]
        );
        assert!(tests.iter().all(|test| test.archive() && test.id() == Some(0)));
        Ok(())
    }

    #[test]
    fn programs_by_index_and_name() -> Result<()> {
        let tests = select_tests(
            &cli(&[
                "--release",
                "2",
                "-i",
                "uvision",
                "-m",
                "k64f",
                "-p",
                "1",
                "-n",
                "MBED_BLINKY",
            ]),
            &catalog(),
        )?;
        let descriptors: Vec<_> = tests.iter().map(TestCase::descriptor).collect();
        assert_eq!(
            descriptors,
            vec!["K64F::uvision\tMBED_10", "K64F::uvision\tMBED_BLINKY"]
        );
        assert_eq!(tests[0].log(), Path::new("build/build_log.txt"));
        Ok(())
    }

    #[test]
    fn repeated_selections_are_collapsed() -> Result<()> {
        let catalog = catalog();
        let tests = select_tests(
            &cli(&[
                "--release",
                "2",
                "-i",
                "make_gcc_arm",
                "-m",
                "K64F",
                "-p",
                "0,1",
                "-n",
                "MBED_BLINKY",
            ]),
            &catalog,
        )?;
        let descriptors: Vec<_> = tests.iter().map(TestCase::descriptor).collect();
        assert_eq!(
            descriptors,
            vec!["K64F::make_gcc_arm\tMBED_BLINKY", "K64F::make_gcc_arm\tMBED_10"]
        );

        let tests = select_tests(
            &cli(&[
                "--release",
                "2",
                "-i",
                "make_gcc_arm,make_gcc_arm",
                "-m",
                "K64F,k64f",
            ]),
            &catalog,
        )?;
        assert_eq!(tests.len(), 1);
        Ok(())
    }

    #[test]
    fn ide_ids_are_case_insensitive() -> Result<()> {
        let tests = select_tests(
            &cli(&["--release", "2", "-i", "MAKE_GCC_ARM,Make_Gcc_Arm", "-m", "K64F"]),
            &catalog(),
        )?;
        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].ide(), "make_gcc_arm");
        Ok(())
    }

    #[test]
    fn invalid_selections() {
        let catalog = catalog();
        let selections: [&[&str]; 6] = [
            &["--release", "2", "-i", "eclipse"],
            &["--release", "2", "-i", "make_gcc_arm", "-m", "NUCLEO_F401RE"],
            &["--release", "2", "-i", "make_gcc_arm", "-p", "7"],
            &["--release", "2", "-i", "make_gcc_arm", "-n", "MBED_99"],
            &["--release", "3", "-i", "make_gcc_arm"],
            &["--release", "5", "-i", "make_gcc_arm", "-m", "LPC1768"],
        ];
        for args in selections {
            let result = select_tests(&cli(args), &catalog);
            assert!(
                matches!(result, Err(Error::Selection(_))),
                "{args:?} should be rejected"
            );
        }
    }

    #[test]
    fn os_tests_of_newer_release() -> Result<()> {
        let root = tempfile::tempdir()?;
        let basic = root.path().join("sdk/TESTS/mbedmicro-rtos-mbed/basic");
        fs::create_dir_all(&basic)?;
        fs::create_dir_all(root.path().join("sdk/TESTS/mbedmicro-rtos-mbed/mutex"))?;
        let root_arg = root.path().to_string_lossy().into_owned();

        let tests = select_tests(
            &cli(&["-i", "make_gcc_arm", "--root", root_arg.as_str()]),
            &catalog(),
        )?;
        assert_eq!(tests.len(), 1);
        assert_eq!(
            tests[0].descriptor(),
            "K64F::make_gcc_arm\ttests-mbedmicro-rtos-mbed-basic"
        );
        assert_eq!(tests[0].id(), None);
        assert_eq!(tests[0].sources(), &[basic, root.path().to_path_buf()]);

        let result = select_tests(
            &cli(&[
                "-i",
                "make_gcc_arm",
                "--root",
                root_arg.as_str(),
                "--os-tests",
                "tests-foo-bar",
            ]),
            &catalog(),
        );
        assert!(matches!(
            result,
            Err(Error::Selection(message)) if message.contains("tests-mbedmicro-rtos-mbed-mutex")
        ));
        Ok(())
    }

    #[test]
    fn demo_catalog_matches_defaults() -> Result<()> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../demos/catalog.toml");
        let catalog = Catalog::from_file(&path)?;
        let tests = select_tests(&cli(&["--release", "2", "-m", "K64F"]), &catalog)?;
        assert_eq!(tests.len(), crate::cli::DEFAULT_IDES.len());
        assert!(tests.iter().all(|test| test.name() == DEFAULT_PROGRAM));
        Ok(())
    }
}
