use std::env;
use std::path::PathBuf;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use log::{info, warn};
use serde::Deserialize;

use charlm_core::io::{get_filename, list_files, normalize_folder};
use charlm_core::{LanguageModel, SeedMode};

const DATA_FOLDER: &str = "./data";
const DATA_FOLDER_VAR: &str = "CHARLM_DATA";
const CORPUS_EXTENSION: &str = "txt";

/// Query parameters for the `/v1/train` endpoint
#[derive(Deserialize)]
struct TrainParams {
	corpus: Option<String>,
	window: Option<usize>,
	seed: Option<SeedMode>, // random, fixed, fixed:<n> or <n>
}

/// Query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	text: Option<String>,
	length: Option<usize>,
}

/// Folder holding the `.txt` corpora, from `CHARLM_DATA` (default `./data`).
struct DataFolder(PathBuf);

impl DataFolder {
	fn from_env() -> Self {
		let folder = env::var(DATA_FOLDER_VAR).unwrap_or_else(|_| DATA_FOLDER.to_owned());
		DataFolder(normalize_folder(&folder))
	}
}

/// The model is mutated by every generation (generator state), so it is
/// always accessed through the lock.
struct SharedData {
	corpus: Option<String>,
	model: Option<LanguageModel>,
}

/// HTTP GET endpoint `/v1/corpora`
///
/// Lists the corpora available in the data folder, one name per line.
#[get("/v1/corpora")]
async fn get_corpora(folder: web::Data<DataFolder>) -> impl Responder {
	match list_files(&folder.0, CORPUS_EXTENSION) {
		Ok(files) => {
			let names: Vec<String> = files.iter().filter_map(|file| get_filename(file).ok()).collect();
			HttpResponse::Ok().body(names.join("\n"))
		}
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora")
	}
}

/// HTTP PUT endpoint `/v1/train`
///
/// Builds a fresh model from `<data folder>/<corpus>.txt` and replaces the
/// shared one. Reading and training run on the blocking thread pool.
#[put("/v1/train")]
async fn put_train(
	data: web::Data<Mutex<SharedData>>,
	folder: web::Data<DataFolder>,
	query: web::Query<TrainParams>,
) -> impl Responder {
	let corpus = match &query.corpus {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};
	if corpus.contains(['/', '\\']) || corpus.starts_with('.') {
		return HttpResponse::BadRequest().body("Invalid corpus name");
	}
	let window = query.window.unwrap_or(7);
	let seed = query.seed.unwrap_or_default();

	let mut model = match LanguageModel::new(window, seed) {
		Ok(m) => m,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
	};
	let corpus_path = folder.0.join(format!("{}.{}", corpus, CORPUS_EXTENSION));
	let trained = web::block(move || -> charlm_core::Result<LanguageModel> {
		model.train_file(&corpus_path)?;
		Ok(model)
	})
	.await;
	let model = match trained {
		Ok(Ok(model)) => model,
		Ok(Err(e)) => {
			warn!("training on '{}' failed: {}", corpus, e);
			return HttpResponse::InternalServerError().body(format!("Failed to train model: {e}"));
		}
		Err(_) => return HttpResponse::InternalServerError().body("Training task failed"),
	};
	info!("trained on '{}': {} windows, seed {}", corpus, model.len(), model.seed());

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let body = format!("Model trained on '{}' ({} windows, seed {})", corpus, model.len(), model.seed());
	shared_data.corpus = Some(corpus.to_owned());
	shared_data.model = Some(model);

	HttpResponse::Ok().body(body)
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates text from the shared model. `length` is the total length,
/// `text` included.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let text = match &query.text {
		Some(s) => s.as_str(),
		None => return HttpResponse::BadRequest().body("Missing seed text"),
	};
	let length = query.length.unwrap_or(100);

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let model = match shared_data.model.as_mut() {
		Some(model) => model,
		None => return HttpResponse::BadRequest().body("No model trained, call /v1/train first"),
	};

	match model.generate(text, length) {
		Ok(result) => HttpResponse::Ok().body(result),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/model`
///
/// Returns the shared model's windows and statistics as JSON.
#[get("/v1/model")]
async fn get_model(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	match &shared_data.model {
		Some(model) => HttpResponse::Ok().json(model),
		None => HttpResponse::NotFound().body("No model trained"),
	}
}

/// HTTP GET endpoint `/v1/model/debug`
///
/// Plain text dump of the shared model, one window per line.
#[get("/v1/model/debug")]
async fn get_model_debug(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	match (&shared_data.corpus, &shared_data.model) {
		(Some(corpus), Some(model)) => HttpResponse::Ok().body(format!("# {}\n{}", corpus, model.to_debug_string())),
		_ => HttpResponse::NotFound().body("No model trained"),
	}
}

/// Main entry point for the server.
///
/// Starts without a model; `PUT /v1/train` builds one from a corpus of the
/// data folder (`CHARLM_DATA`, `.` for the working directory). The shared model sits behind a `Mutex` since training and
/// generation both mutate it.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let shared_data = SharedData {
		corpus: None,
		model: None,
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));
	let data_folder = web::Data::new(DataFolder::from_env());

	info!("listening on 127.0.0.1:5000, corpora in {}", data_folder.0.display());
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.app_data(data_folder.clone())
			.service(get_corpora)
			.service(put_train)
			.service(get_generated)
			.service(get_model)
			.service(get_model_debug)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
