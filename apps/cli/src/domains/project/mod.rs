mod args;

use anyhow::{Context as _, Result};
use clap::Subcommand;
use tokio::io::AsyncReadExt;
use zl_api::{
	project, render, validate, yaml, Project, ProjectId, RenderInfo, ValidationReport,
};

use crate::util::prelude::*;

use self::args::*;

#[derive(Subcommand, Debug)]
pub enum ProjectCmd {
	/// List projects
	List,
	/// Show one project
	Show(ProjectArgs),
	/// Create a project, optionally seeded from a preset
	Create(ProjectCreateArgs),
	/// Rename a project
	Rename(ProjectRenameArgs),
	/// Delete a project and everything in it
	Delete(ProjectArgs),
	/// Layout spec (YAML) commands
	#[command(subcommand)]
	Yaml(YamlCmd),
	/// Check the project's images against its layout spec
	Validate(ProjectArgs),
	/// Render commands
	#[command(subcommand)]
	Render(RenderCmd),
}

#[derive(Subcommand, Debug)]
pub enum YamlCmd {
	/// Print the layout spec
	Get(ProjectArgs),
	/// Replace the layout spec with the contents of a file ("-" for stdin)
	Put(YamlPutArgs),
}

#[derive(Subcommand, Debug)]
pub enum RenderCmd {
	/// List finished renders
	List(ProjectArgs),
	/// Start a render
	Trigger(RenderTriggerArgs),
	/// Print the download address of a render
	Url(RenderUrlArgs),
}

pub async fn run(ctx: &Context, cmd: ProjectCmd) -> Result<()> {
	match cmd {
		ProjectCmd::List => {
			let out = project::list(&ctx.api).await?;
			print_output!(ctx, &out, |projects: &Vec<Project>| {
				if projects.is_empty() {
					println!("No projects found");
					return;
				}
				for p in projects {
					println!("- {} {}", p.id, p.name);
				}
			});
		}
		ProjectCmd::Show(args) => {
			let out = project::get(&ctx.api, &args.project_id()).await?;
			print_output!(ctx, &out, print_project);
		}
		ProjectCmd::Create(args) => {
			let out =
				project::create(&ctx.api, args.name.as_deref(), args.preset.as_deref()).await?;
			print_output!(ctx, &out, |p: &Project| {
				println!("Created project {} with ID {}", p.name, p.id);
			});
		}
		ProjectCmd::Rename(args) => {
			let id = ProjectId::from(args.project.as_str());
			let out = project::rename(&ctx.api, &id, &args.name).await?;
			print_output!(ctx, &out, |p: &Project| {
				println!("Renamed project {} to {}", p.id, p.name);
			});
		}
		ProjectCmd::Delete(args) => {
			project::delete(&ctx.api, &args.project_id()).await?;
			println!("Deleted project {}", args.project);
		}
		ProjectCmd::Yaml(cmd) => run_yaml(ctx, cmd).await?,
		ProjectCmd::Validate(args) => {
			let out = validate::run(&ctx.api, &args.project_id()).await?;
			print_output!(ctx, &out, print_report);
		}
		ProjectCmd::Render(cmd) => run_render(ctx, cmd).await?,
	}

	Ok(())
}

async fn run_yaml(ctx: &Context, cmd: YamlCmd) -> Result<()> {
	match cmd {
		YamlCmd::Get(args) => {
			let out = yaml::get(&ctx.api, &args.project_id()).await?;
			print_output!(ctx, &out, |spec: &String| print!("{spec}"));
		}
		YamlCmd::Put(args) => {
			let spec = if args.file.as_os_str() == "-" {
				let mut buf = String::new();
				tokio::io::stdin().read_to_string(&mut buf).await?;
				buf
			} else {
				tokio::fs::read_to_string(&args.file)
					.await
					.with_context(|| format!("Failed to read {}", args.file.display()))?
			};

			yaml::put(&ctx.api, &ProjectId::from(args.project.as_str()), spec).await?;
			println!("Layout spec saved");
		}
	}

	Ok(())
}

async fn run_render(ctx: &Context, cmd: RenderCmd) -> Result<()> {
	match cmd {
		RenderCmd::List(args) => {
			let out = render::list(&ctx.api, &args.project_id()).await?;
			print_output!(ctx, &out, |renders: &Vec<RenderInfo>| {
				if renders.is_empty() {
					println!("No renders yet");
					return;
				}
				for r in renders {
					println!("- {} ({} files)", r.id, r.files.len());
				}
			});
		}
		RenderCmd::Trigger(args) => {
			let project = ProjectId::from(args.project.as_str());
			render::trigger(&ctx.api, &project, &args.to_options()).await?;
			println!("Render started for project {}", args.project);
		}
		RenderCmd::Url(args) => {
			let project = ProjectId::from(args.project.as_str());
			let url = render::download_url(&ctx.api, &project, &args.render_id)?;
			println!("{url}");
		}
	}

	Ok(())
}

fn print_project(p: &Project) {
	println!("Project Information");
	println!("===================");
	println!("ID: {}", p.id);
	println!("Name: {}", p.name);
	if let Some(preset) = &p.preset_id {
		println!("Preset: {preset}");
	}
	println!("Created: {}", p.created_at);
	println!("Updated: {}", p.updated_at);
}

fn print_report(report: &ValidationReport) {
	if report.ok {
		println!("Layout is valid");
	} else {
		println!("Layout has problems:");
		for issue in &report.issues {
			println!("  - {issue}");
		}
	}

	if let Some(d) = &report.details {
		println!();
		println!("Images: {} ({} per sheet multiple)", d.count, d.multiple);
		println!("Page size: {}x{}", d.width, d.height);
		println!("Grid: {} rows x {} columns", d.rows, d.columns);
		println!("Pages: {}", d.pages);
	}
}
