use anyhow::Result;
use clap::Subcommand;
use zl_api::{preset, PresetInfo, ProjectId};

use crate::util::prelude::*;

#[derive(Subcommand, Debug)]
pub enum PresetCmd {
	/// List the layout presets known to the server
	List,
	/// Print a preset's layout spec
	Show { preset_id: String },
	/// Replace a project's layout spec with a preset
	Apply { project: String, preset_id: String },
}

pub async fn run(ctx: &Context, cmd: PresetCmd) -> Result<()> {
	match cmd {
		PresetCmd::List => {
			let out = preset::list(&ctx.api).await?;
			print_output!(ctx, &out, |presets: &Vec<PresetInfo>| {
				if presets.is_empty() {
					println!("No presets available");
					return;
				}
				for p in presets {
					println!("- {} {} ({})", p.id, p.name, p.filename);
				}
			});
		}
		PresetCmd::Show { preset_id } => {
			let out = preset::get_yaml(&ctx.api, &preset_id).await?;
			print_output!(ctx, &out, |spec: &String| print!("{spec}"));
		}
		PresetCmd::Apply { project, preset_id } => {
			preset::apply(&ctx.api, &ProjectId::from(project.as_str()), &preset_id).await?;
			println!("Applied preset {preset_id} to project {project}");
		}
	}

	Ok(())
}
