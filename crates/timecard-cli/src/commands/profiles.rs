use std::path::Path;
use timecard_core::error::TimecardError;
use timecard_core::profile::builtin;

pub fn list() -> Result<(), TimecardError> {
    println!("Available predefined profiles:\n");
    for name in builtin::PRESETS {
        let p = builtin::load_preset(name)?;
        let default_marker = if *name == builtin::DEFAULT_PRESET {
            " [default]"
        } else {
            ""
        };
        println!("  {:<16} {} (v{}){}", name, p.name, p.version, default_marker);
        if let Some(ref desc) = p.description {
            println!("                   {}", desc);
        }
        println!("                   members: {}", p.members.join(", "));
        println!();
    }
    Ok(())
}

pub fn show(preset: &str) -> Result<(), TimecardError> {
    let p = builtin::load_preset(preset)?;
    println!("{}", serde_json::to_string_pretty(&p)?);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), TimecardError> {
    let p = timecard_core::profile::load_profile(file)?;
    println!("Profile is valid.\n");
    println!("  Name:            {}", p.name);
    println!("  Version:         {}", p.version);
    println!("  Members:         {}", p.members.join(", "));
    if !p.aliases.is_empty() {
        let aliases: Vec<String> = p
            .aliases
            .iter()
            .map(|(from, to)| format!("{from} -> {to}"))
            .collect();
        println!("  Aliases:         {}", aliases.join(", "));
    }
    println!("  Default project: {}", p.default_project);
    println!(
        "  Windows:         member ±{}, date +{}/-{}/±{}",
        p.member_window, p.date_forward_window, p.date_backward_window, p.date_wide_window
    );
    if let Some(ref total) = p.expected_total {
        println!("  Expected total:  {}", total);
    }
    Ok(())
}
