//! Makefile exporters.
//!
//! One generic Makefile layout with three toolchain flavors. The generated
//! Makefile re-invokes itself from a `BUILD` subdirectory with `VPATH = ..`,
//! so every path written into it is prefixed with `..`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use exb_io::runner::Runner;
use tracing::debug;

use crate::build::BuildInvocation;
use crate::context::ProjectContext;
use crate::prelude::*;

/// Name of the generated file.
pub const MAKEFILE: &str = "Makefile";

/// Path prefix of every exported file, seen from the `BUILD` directory.
const VPATH: &str = "..";

/// Toolchain specific parts of the Makefile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MakeFlavor {
    GccArm,
    Armc5,
    Iar,
}

impl MakeFlavor {
    /// Flavor for a compiler toolchain name.
    pub fn from_toolchain(toolchain: &str) -> Option<Self> {
        match toolchain {
            "GCC_ARM" => Some(MakeFlavor::GccArm),
            "ARM" => Some(MakeFlavor::Armc5),
            "IAR" => Some(MakeFlavor::Iar),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MakeFlavor::GccArm => "Make-GCC-ARM",
            MakeFlavor::Armc5 => "Make-ARMc5",
            MakeFlavor::Iar => "Make-IAR",
        }
    }

    pub fn toolchain(self) -> &'static str {
        match self {
            MakeFlavor::GccArm => "GCC_ARM",
            MakeFlavor::Armc5 => "ARM",
            MakeFlavor::Iar => "IAR",
        }
    }

    fn link_script_option(self) -> &'static str {
        match self {
            MakeFlavor::GccArm => "-T",
            MakeFlavor::Armc5 => "--scatter",
            MakeFlavor::Iar => "--config",
        }
    }

    fn user_library_flag(self) -> &'static str {
        match self {
            MakeFlavor::GccArm | MakeFlavor::Iar => "-L",
            MakeFlavor::Armc5 => "--userlibpath ",
        }
    }

    fn link_output_option(self) -> &'static str {
        match self {
            MakeFlavor::GccArm | MakeFlavor::Iar => "-o",
            MakeFlavor::Armc5 => "--output",
        }
    }

    fn elf2bin_args(self) -> &'static str {
        match self {
            MakeFlavor::GccArm => "-O binary $< $@",
            MakeFlavor::Armc5 => "--bin -o $@ $<",
            MakeFlavor::Iar => "--bin $< $@",
        }
    }

    /// Linker argument for a library file name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use exb_export::makefile::MakeFlavor;
    ///
    /// assert_eq!(MakeFlavor::GccArm.prepare_lib("libcmsis.a"), "-l:libcmsis.a");
    /// assert_eq!(MakeFlavor::Armc5.prepare_lib("cmsis.ar"), "cmsis.ar");
    /// assert_eq!(MakeFlavor::Iar.prepare_lib("libcmsis.a"), "-lcmsis");
    /// ```
    pub fn prepare_lib(self, libname: &str) -> String {
        match self {
            MakeFlavor::GccArm => format!("-l:{libname}"),
            MakeFlavor::Armc5 => libname.to_string(),
            MakeFlavor::Iar => {
                let libname = libname.strip_prefix("lib").unwrap_or(libname);
                let stem = Path::new(libname)
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!("-l{stem}")
            }
        }
    }
}

fn quote(parts: &[String]) -> String {
    parts
        .iter()
        .map(|part| format!("'{part}'"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn vpath(path: &str) -> String {
    format!("{VPATH}/{path}")
}

fn object_name(source: &str) -> String {
    match source.rsplit_once('.') {
        Some((stem, _)) => format!("{stem}.o"),
        None => format!("{source}.o"),
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn compile_rule(lines: &mut Vec<String>, ext: &str, label: &str, tool: &str, flags: &str) {
    lines.push(format!("%.o: %.{ext}"));
    lines.push(String::from("\t+@mkdir -p $(dir $@)"));
    lines.push(format!("\t+@echo \"{label}: $(notdir $<)\""));
    lines.push(format!("\t@$({tool}) {flags} $(INCLUDE_PATHS) -o $@ $<"));
    lines.push(String::new());
}

/// Render the Makefile of a project.
pub fn render(context: &ProjectContext<'_>, flavor: MakeFlavor) -> String {
    let resources = context.resources;
    let compiler = context.compiler;
    let flags = context.flags;
    let mut lines = vec![
        String::from("# This file was automatically generated by exb."),
        format!(
            "# Exporter: {}, target: {}, project: {}",
            flavor.name(),
            context.target.name,
            context.name
        ),
        String::new(),
        String::from("ifeq (,$(filter BUILD,$(notdir $(CURDIR))))"),
        String::from(".SUFFIXES:"),
        String::from("mkfile_path := $(abspath $(lastword $(MAKEFILE_LIST)))"),
        String::from(
            "MAKETARGET = '$(MAKE)' --no-print-directory -C BUILD -f '$(mkfile_path)' 'SRCDIR=$(CURDIR)' $(MAKECMDGOALS)",
        ),
        String::from(".PHONY: BUILD clean all"),
        String::from("all:"),
        String::from("\t+@-mkdir -p BUILD"),
        String::from("\t+@$(MAKETARGET)"),
        String::from("BUILD: all"),
        String::from("clean:"),
        String::from("\t-rm -rf BUILD"),
        String::from("else"),
        String::new(),
        format!("VPATH = {VPATH}"),
        format!("PROJECT := {}", context.name),
        String::new(),
    ];

    let mut objects: Vec<_> = resources.sources().map(|s| object_name(s)).collect();
    objects.sort();
    objects.dedup();
    lines.extend(objects.iter().map(|o| format!("OBJECTS += {o}")));
    lines.extend(
        resources
            .objects
            .iter()
            .map(|o| format!("SYS_OBJECTS += {}", vpath(o))),
    );

    let mut include_paths: Vec<_> = resources.inc_dirs.iter().map(|d| vpath(d)).collect();
    let root_include = vpath(".");
    if !include_paths.contains(&root_include) {
        include_paths.push(root_include);
    }
    include_paths.sort();
    lines.extend(include_paths.iter().map(|i| format!("INCLUDE_PATHS += -I{i}")));
    lines.extend(resources.lib_dirs.iter().map(|d| {
        format!(
            "LIBRARY_PATHS += {}{}",
            flavor.user_library_flag(),
            vpath(d)
        )
    }));
    lines.extend(
        resources
            .libraries
            .iter()
            .map(|lib| format!("LIBRARIES += {}", flavor.prepare_lib(file_name(lib)))),
    );
    if let Some(script) = &resources.linker_script {
        lines.push(format!("LINKER_SCRIPT ?= {}", vpath(script)));
    }
    let mut hex_files: Vec<_> = resources.hex_files.iter().map(|h| vpath(h)).collect();
    hex_files.sort();
    lines.extend(hex_files.iter().map(|h| format!("HEX_FILES += {h}")));
    lines.push(String::new());

    lines.push(format!("AS      = {}", quote(&compiler.asm)));
    lines.push(format!("CC      = {}", quote(&compiler.cc)));
    lines.push(format!("CPP     = {}", quote(&compiler.cppc)));
    lines.push(format!("LD      = {}", quote(&compiler.ld)));
    lines.push(format!("ELF2BIN = '{}'", compiler.elf2bin));
    lines.push(String::new());

    lines.extend(
        context
            .symbols()
            .iter()
            .map(|s| format!("SYMBOLS += -D{s}")),
    );
    for (variable, specific) in [
        ("C_FLAGS", &flags.c),
        ("CXX_FLAGS", &flags.cxx),
        ("ASM_FLAGS", &flags.asm),
    ] {
        lines.extend(
            flags
                .common
                .iter()
                .chain(specific.iter())
                .map(|flag| format!("{variable} += {flag}")),
        );
    }
    lines.extend(flags.ld.iter().map(|flag| format!("LD_FLAGS += {flag}")));
    lines.push(String::new());

    lines.push(String::from(".PHONY: all"));
    lines.push(String::from("all: $(PROJECT).bin"));
    lines.push(String::new());
    compile_rule(&mut lines, "s", "Assemble", "AS", "$(ASM_FLAGS)");
    compile_rule(&mut lines, "S", "Assemble", "AS", "$(ASM_FLAGS)");
    compile_rule(&mut lines, "c", "Compile", "CC", "$(C_FLAGS) $(SYMBOLS)");
    for ext in ["cpp", "cc", "cxx"] {
        compile_rule(&mut lines, ext, "Compile", "CPP", "$(CXX_FLAGS) $(SYMBOLS)");
    }

    let link_script = if resources.linker_script.is_some() {
        format!("{} $(LINKER_SCRIPT) ", flavor.link_script_option())
    } else {
        String::new()
    };
    lines.push(String::from(
        "$(PROJECT).elf: $(OBJECTS) $(SYS_OBJECTS) $(LINKER_SCRIPT)",
    ));
    lines.push(String::from("\t+@echo \"link: $(notdir $@)\""));
    lines.push(format!(
        "\t@$(LD) $(LD_FLAGS) {link_script}$(LIBRARY_PATHS) {} $@ $(filter %.o, $^) $(LIBRARIES)",
        flavor.link_output_option()
    ));
    lines.push(String::new());
    lines.push(String::from("$(PROJECT).bin: $(PROJECT).elf"));
    lines.push(format!("\t$(ELF2BIN) {}", flavor.elf2bin_args()));
    lines.push(String::new());
    lines.push(String::from("endif"));

    let mut makefile = lines.join("\n");
    makefile.push('\n');
    makefile
}

/// Write the Makefile into the export directory.
pub fn generate(context: &ProjectContext<'_>, flavor: MakeFlavor) -> Result<PathBuf> {
    let path = context.export_dir.join(MAKEFILE);
    fs::write(&path, render(context, flavor))?;
    debug!("Generated {:?} with {}", path, flavor.name());
    Ok(path)
}

/// `make -C <project_dir> -j`, logging into `log_path`.
pub fn invocation(project_name: &str, project_dir: &Path, log_path: PathBuf) -> BuildInvocation {
    let runner = Runner::new(
        "make",
        vec![
            String::from("-C"),
            project_dir.to_string_lossy().into_owned(),
            String::from("-j"),
        ],
    );
    BuildInvocation::new(project_name, runner, log_path)
}
