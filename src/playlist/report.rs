use crate::commands::playlist::{ListCommand, ScanCommand};
use crate::cue::models::Song;
use crate::error::EmbcueResult;
use crate::playlist::EMBEDDED_CUE_PLAYLIST_PLUGIN;
use crate::playlist::embedded_cue::LocatorOptions;
use crate::util::fs::find_files;
use futures::StreamExt;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::PathBuf;
use tokio::fs;

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistReport {
    pub path: PathBuf,
    pub songs: Vec<Song>,
}

/// Reads the embedded playlist of a file on the blocking pool.
pub async fn load_playlist(
    path: PathBuf,
    options: LocatorOptions,
) -> EmbcueResult<Option<PlaylistReport>> {
    debug!("Opening {path:?} with the {} plugin", EMBEDDED_CUE_PLAYLIST_PLUGIN.name);

    let report = tokio::task::spawn_blocking(move || {
        let songs = EMBEDDED_CUE_PLAYLIST_PLUGIN.open(&path, options)?.collect();
        Some(PlaylistReport { path, songs })
    })
    .await?;

    Ok(report)
}

pub async fn list_playlists(cmd: ListCommand) -> EmbcueResult<()> {
    let options = cmd.output.locator_options();
    let mut reports = Vec::with_capacity(cmd.files.len());

    for file in cmd.files {
        let path = match fs::canonicalize(&file).await {
            Ok(path) => path,
            Err(err) => {
                warn!("Skipping {file:?}: {err}");
                continue;
            }
        };

        match load_playlist(path, options).await? {
            Some(report) => reports.push(report),
            None => warn!("No embedded cue sheet found in {file:?}"),
        }
    }

    print_reports(&reports, cmd.output.json)
}

pub async fn scan_directory(pb: MultiProgress, cmd: ScanCommand) -> EmbcueResult<()> {
    let options = cmd.output.locator_options();
    let dir = fs::canonicalize(&cmd.dir).await?;

    debug!("Searching {dir:?} for supported files");
    let files = find_files(&dir, |path| EMBEDDED_CUE_PLAYLIST_PLUGIN.supports_path(path)).await?;
    info!("Found {} candidate files in {dir:?}", files.len());

    let bar = pb.add(ProgressBar::new(files.len() as u64));
    bar.set_style(ProgressStyle::with_template(
        "{spinner} [{bar:40}] {pos}/{len} {wide_msg}",
    )?);

    let mut loads = futures::stream::iter(files)
        .map(|path| load_playlist(path, options))
        .buffered(cmd.jobs.max(1));

    let mut reports = Vec::new();
    while let Some(report) = loads.next().await {
        bar.inc(1);
        if let Some(report) = report? {
            bar.set_message(report.path.display().to_string());
            reports.push(report);
        }
    }
    bar.finish_and_clear();

    info!("{} files carry an embedded cue sheet", reports.len());
    print_reports(&reports, cmd.output.json)
}

fn print_reports(reports: &[PlaylistReport], json: bool) -> EmbcueResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
    } else {
        for report in reports {
            print!("{}", format_report(report));
        }
    }

    Ok(())
}

pub fn format_report(report: &PlaylistReport) -> String {
    let mut out = format!("{} ({} tracks)\n", report.path.display(), report.songs.len());

    for song in &report.songs {
        let number = song.track.map(|n| format!("{n:02}")).unwrap_or_default();
        let start = format_millis(song.start_ms);
        let title = song.title.as_deref().unwrap_or("Unknown Title");
        let line = match &song.performer {
            Some(performer) => format!("  {number:>3}  {start}  {performer} - {title}\n"),
            None => format!("  {number:>3}  {start}  {title}\n"),
        };
        out.push_str(&line);
    }

    out
}

/// `mm:ss.mmm`, minutes are not wrapped into hours.
pub fn format_millis(ms: u64) -> String {
    format!("{:02}:{:02}.{:03}", ms / 60_000, ms / 1000 % 60, ms % 1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::vorbis::tests::flac_file;

    #[test]
    fn millis_are_formatted_as_minutes_and_seconds() {
        assert_eq!(format_millis(0), "00:00.000");
        assert_eq!(format_millis(62_333), "01:02.333");
        assert_eq!(format_millis(75 * 60_000), "75:00.000");
    }

    #[test]
    fn report_lists_tracks() {
        let report = PlaylistReport {
            path: PathBuf::from("/music/album.flac"),
            songs: vec![
                Song {
                    uri: "album.flac".to_string(),
                    track: Some(1),
                    title: Some("Intro".to_string()),
                    performer: Some("Band".to_string()),
                    ..Song::default()
                },
                Song {
                    uri: "album.flac".to_string(),
                    track: Some(2),
                    start_ms: 90_500,
                    ..Song::default()
                },
            ],
        };

        assert_eq!(
            format_report(&report),
            "/music/album.flac (2 tracks)\n   01  00:00.000  Band - Intro\n   02  01:30.500  Unknown Title\n"
        );
    }

    #[test]
    fn report_without_track_number_keeps_columns() {
        let report = PlaylistReport {
            path: PathBuf::from("/music/live.ogg"),
            songs: vec![Song {
                uri: "live.ogg".to_string(),
                title: Some("Encore".to_string()),
                start_ms: 3_723_004,
                ..Song::default()
            }],
        };

        assert_eq!(
            format_report(&report),
            "/music/live.ogg (1 tracks)\n       62:03.004  Encore\n"
        );
    }

    #[tokio::test]
    async fn load_playlist_reads_the_file() {
        let file = flac_file(&["CUESHEET=TRACK 01\nTITLE \"A\""]);

        let report = load_playlist(file.path().to_path_buf(), LocatorOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(report.path, file.path());
        assert_eq!(report.songs.len(), 1);
    }

    #[tokio::test]
    async fn load_playlist_without_cuesheet_is_none() {
        let file = flac_file(&["TITLE=Nothing"]);

        let report = load_playlist(file.path().to_path_buf(), LocatorOptions::default())
            .await
            .unwrap();
        assert!(report.is_none());
    }
}
