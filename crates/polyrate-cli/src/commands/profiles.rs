//! Profile listing command.

use clap::Args;
use polyrate_config::{Profile, builtin_profiles, list_user_profiles, profile_name_from_path, user_profiles_dir};

#[derive(Args)]
pub struct ProfilesArgs {
    /// Show only built-in profiles
    #[arg(long, conflicts_with = "user")]
    builtin: bool,

    /// Show only user profiles
    #[arg(long)]
    user: bool,
}

pub fn run(args: ProfilesArgs) -> anyhow::Result<()> {
    if !args.user {
        println!("Built-in Profiles:");
        println!("==================");
        for profile in builtin_profiles() {
            print_profile(&profile.name, &profile);
        }
        println!();
    }

    if !args.builtin {
        println!("User Profiles ({}):", user_profiles_dir().display());
        println!("==============");
        let user_profiles = list_user_profiles();
        if user_profiles.is_empty() {
            println!("  (none)");
        }
        for path in user_profiles {
            let name = profile_name_from_path(&path).unwrap_or_else(|| "unknown".to_string());
            match Profile::load(&path) {
                Ok(profile) => print_profile(&name, &profile),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "unreadable profile");
                    println!("  {name:12} (error loading)");
                }
            }
        }
        println!();
    }

    Ok(())
}

fn print_profile(name: &str, profile: &Profile) {
    let channels = profile
        .channels
        .map_or_else(|| "any".to_string(), |c| c.to_string());
    println!(
        "  {:12} {:>6} Hz  channels {:3}  dither {:10}  {}",
        name,
        profile.output_rate,
        channels,
        profile.dither.to_string(),
        profile.description.as_deref().unwrap_or("")
    );
}
