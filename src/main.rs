use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;

use jukebox::app::cli::{Args, Command, PlaybackOption, VolumeChange};
use jukebox::app::config::{AppConfig, UserConfig};
use jukebox::app::logging;
use jukebox::artwork;
use jukebox::player::{is_stream_uri, ChangeEvent, Daemon, DirEntry, PlayerAction, Tag};
use jukebox::Jukebox;

/// UI tick; the status poll itself is rate-limited by `update_interval_ms`.
const TICK: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    human_panic::setup_panic!();
    let args = Args::parse();

    if args.generate_config {
        print!("{}", AppConfig::default_toml()?);
        return Ok(());
    }

    let config_path = args.config.clone().unwrap_or_else(AppConfig::get_config_path);
    let _log_guard = logging::init(&AppConfig::get_config_dir());
    let mut config = AppConfig::load_from(&config_path);
    if let Some(host) = &args.host {
        config.mpd.host = host.clone();
    }
    if let Some(port) = args.port {
        config.mpd.port = port;
    }

    let command = args.command.clone().unwrap_or(Command::Monitor);

    // Station edits never need the daemon
    match &command {
        Command::Stations => {
            for station in &config.radio_stations {
                println!("{}\t{}", station.name, station.url);
            }
            return Ok(());
        }
        Command::StationSet { name, url } => {
            config.radio_station_set(name, url);
            return AppConfig::save_to(&config, &config_path);
        }
        Command::StationRemove { name } => {
            if !config.radio_station_remove(name) {
                bail!("No radio station named '{}'", name);
            }
            return AppConfig::save_to(&config, &config_path);
        }
        _ => {}
    }

    run(&config, command)
}

#[cfg(feature = "mpd")]
fn run(config: &UserConfig, command: Command) -> Result<()> {
    use anyhow::Context;

    let daemon = match jukebox::player::MpdDaemon::connect(&config.mpd.host, config.mpd.port) {
        Ok(daemon) => daemon,
        Err(e) => {
            eprintln!("{}. Is mpd running? Start it with 'sudo service mpd start'.", e);
            std::process::exit(1);
        }
    };
    tracing::info!(addr = daemon.addr(), "Jukebox connected");

    let mut jukebox = Jukebox::new(daemon, config.mpd.update_interval());
    jukebox.start().context("Failed to read initial MPD state")?;
    dispatch(&mut jukebox, config, command)
}

#[cfg(not(feature = "mpd"))]
fn run(_config: &UserConfig, _command: Command) -> Result<()> {
    bail!("jukebox was built without MPD support (enable the `mpd` feature)")
}

fn dispatch<D: Daemon>(jukebox: &mut Jukebox<D>, config: &UserConfig, command: Command) -> Result<()> {
    match command {
        Command::Monitor => monitor(jukebox)?,
        Command::Status { json } => print_status(jukebox, json)?,
        Command::Play => jukebox.player_control_set(PlayerAction::Play)?,
        Command::Pause => jukebox.player_control_set(PlayerAction::Pause)?,
        Command::Stop => jukebox.player_control_set(PlayerAction::Stop)?,
        Command::Next => jukebox.player_control_set(PlayerAction::Next)?,
        Command::Prev => jukebox.player_control_set(PlayerAction::Previous)?,
        Command::Volume { level } => match VolumeChange::parse(&level) {
            Some(VolumeChange::Absolute(volume)) => jukebox.volume_set(volume)?,
            Some(VolumeChange::Relative(delta)) => jukebox.volume_set_relative(delta)?,
            None => bail!("Volume must be 0-100 or +N/-N, got '{}'", level),
        },
        Command::Mute => jukebox.volume_mute_switch()?,
        Command::Toggle { option } => match option {
            PlaybackOption::Random => jukebox.random_switch()?,
            PlaybackOption::Repeat => jukebox.repeat_switch()?,
            PlaybackOption::Single => jukebox.single_switch()?,
            PlaybackOption::Consume => jukebox.consume_switch()?,
        },
        Command::Radio { station } => {
            let url = match config.radio_station_get(&station) {
                Some(s) => s.url.clone(),
                None if is_stream_uri(&station) => station,
                None => bail!("'{}' is neither a configured station nor a stream URL", station),
            };
            jukebox.start_radio_station(&url)?;
        }
        Command::Artists { prefix, contains } => {
            let prefix = prefix.as_deref();
            print_lines(&jukebox.artists_get(prefix, !contains)?);
        }
        Command::Albums { artist } => print_lines(&jukebox.artist_albums_get(&artist)?),
        Command::Songs { artist, album } => {
            let songs = match album {
                Some(album) => {
                    jukebox.artist_albums_get(&artist)?;
                    jukebox.album_songs_get(&album)?
                }
                None => jukebox.artist_songs_get(&artist)?,
            };
            print_lines(&songs);
        }
        Command::Add { artist, album, title, play, clear } => {
            // Narrowest given tag is the one added; wider ones become the filter context
            jukebox.artists_get(None, true)?;
            if let Some(artist) = &artist {
                jukebox.artist_albums_get(artist)?;
            }
            if let Some(album) = &album {
                jukebox.album_songs_get(album)?;
            }
            match (title, album, artist) {
                (Some(title), _, _) => jukebox.playlist_add(Tag::Title, &title, play, clear)?,
                (None, Some(album), _) => jukebox.playlist_add(Tag::Album, &album, play, clear)?,
                (None, None, Some(artist)) => jukebox.playlist_add(Tag::Artist, &artist, play, clear)?,
                (None, None, None) => bail!("Give at least one of --artist, --album or --title"),
            }
        }
        Command::Ls { path } => {
            for entry in jukebox.directory_list(&path)? {
                match entry {
                    DirEntry::Directory(dir) => println!("{}/", dir),
                    DirEntry::File(file) => println!("{}", file),
                }
            }
        }
        Command::AddPath { path, play, clear } => {
            let is_file = !path.is_empty()
                && jukebox
                    .directory_list(parent_dir(&path))?
                    .iter()
                    .any(|e| matches!(e, DirEntry::File(f) if *f == path));
            if is_file {
                jukebox.playlist_add_file(&path, play, clear)?;
            } else {
                jukebox.playlist_add_directory(&path, play, clear)?;
            }
        }
        Command::Playlist => {
            let playing = jukebox.playlist_current_playing_index();
            for (i, line) in jukebox.playlist_current()?.iter().enumerate() {
                let marker = if i as i32 == playing { ">" } else { " " };
                println!("{} {}", marker, line);
            }
        }
        Command::Playlists { prefix } => print_lines(&jukebox.playlists_get(prefix.as_deref())?),
        Command::Update { rescan } => {
            if rescan {
                jukebox.library_rescan()?;
            } else {
                jukebox.library_update()?;
            }
        }
        Command::Cover { dest } => {
            let music_dir = Path::new(&config.music_directory);
            if artwork::save_cover_art(music_dir, jukebox.item(), &dest)? {
                println!("{}", dest.display());
            } else {
                println!("No cover art for the current item");
            }
        }
        Command::Stations | Command::StationSet { .. } | Command::StationRemove { .. } => {}
    }
    Ok(())
}

/// The UI loop without the UI: poll every tick, print what changed.
fn monitor<D: Daemon>(jukebox: &mut Jukebox<D>) -> Result<()> {
    print_status(jukebox, false)?;
    loop {
        if jukebox.poll() {
            for event in jukebox.drain_events() {
                println!("{:<18} {}", event.as_str(), describe(jukebox, event));
            }
        }
        std::thread::sleep(TICK);
    }
}

fn describe<D: Daemon>(jukebox: &Jukebox<D>, event: ChangeEvent) -> String {
    let state = jukebox.state();
    let item = jukebox.item();
    match event {
        ChangeEvent::Volume if state.muted => format!("muted ({})", state.volume),
        ChangeEvent::Volume => state.volume.to_string(),
        ChangeEvent::Repeat => state.repeat.to_string(),
        ChangeEvent::Random => state.random.to_string(),
        ChangeEvent::Single => state.single.to_string(),
        ChangeEvent::Consume => state.consume.to_string(),
        ChangeEvent::Transport => format!("{:?}", state.transport),
        ChangeEvent::PlaylistPosition => state.playlist_position.to_string(),
        ChangeEvent::Elapsed => format!(
            "{} / {} ({}%)",
            item.elapsed_string(),
            item.total_string(),
            item.elapsed_percentage
        ),
        ChangeEvent::PlayingItem => format!("{} - {} [{}]", item.artist, item.title, item.album),
    }
}

fn print_status<D: Daemon>(jukebox: &Jukebox<D>, json: bool) -> Result<()> {
    if json {
        let status = serde_json::json!({
            "state": jukebox.state(),
            "item": jukebox.item(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }
    let state = jukebox.state();
    let item = jukebox.item();
    println!("{:?}{}", state.transport, if state.radio_mode { " (radio)" } else { "" });
    println!("{} - {} [{}]", item.artist, item.title, item.album);
    println!("{} / {}", item.elapsed_string(), item.total_string());
    println!(
        "volume {}{}  repeat {}  random {}  single {}  consume {}",
        state.volume,
        if state.muted { " (muted)" } else { "" },
        state.repeat,
        state.random,
        state.single,
        state.consume
    );
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}
