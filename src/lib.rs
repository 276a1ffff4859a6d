pub mod core;
pub mod analysis;
pub mod record;
pub mod index;
pub mod scoring;
pub mod search;
pub mod storage;
pub mod source;

/*
┌──────────────────────────────────────────────────────────────────────────┐
│                         CARREL STRUCT ARCHITECTURE                       │
└──────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────── CORE ──────────────────────────────────┐
│                                                                          │
│  ┌──────────────────────────────────────────────────────────────────┐   │
│  │                          struct Index                            │   │
│  │  ┌────────────────────────────────────────────────────────────┐  │   │
│  │  │ name: String                    // Index name / directory  │  │   │
│  │  │ field_names: Vec<String>        // Known dotted paths      │  │   │
│  │  │ documents: HashMap<String, Document>                       │  │   │
│  │  │ term_stats: HashMap<String, TermStat>                      │  │   │
│  │  │ shard_count: u32                // 0 = not sharded         │  │   │
│  │  │ loaded_document_shards: RoaringBitmap                      │  │   │
│  │  │ loaded_term_stat_shards: RoaringBitmap                     │  │   │
│  │  │ source: Option<Arc<dyn Source>> // Shard byte source       │  │   │
│  │  │ analyzer: Analyzer              // Token pipeline          │  │   │
│  │  └────────────────────────────────────────────────────────────┘  │   │
│  └──────────────────────────────────────────────────────────────────┘   │
│                                                                          │
│  ┌──────────────────┐  ┌───────────────────┐  ┌───────────────────────┐ │
│  │ struct TermStat  │  │ enum Value        │  │ struct SearchResult   │ │
│  │ • term_          │  │ • Null / Bool     │  │ • count: usize        │ │
│  │   frequencies:   │  │ • Integer / Float │  │ • hits: Vec<Hit>      │ │
│  │   HashMap<String,│  │ • String          │  │ • time: SearchTime    │ │
│  │   u64>           │  │ • List / Map      │  └───────────────────────┘ │
│  └──────────────────┘  └───────────────────┘                            │
└──────────────────────────────────────────────────────────────────────────┘

┌───────────────────────────────── FLOW ───────────────────────────────────┐
│                                                                          │
│  write:  Document ──flatten──> (field, tokens) ──index──> TermStat       │
│              │                                                           │
│              └──save_to_shards──> shard_of(id|term) ──> dcs / tst files  │
│                                                                          │
│  read:   query ──analyze──> tokens ──fetch_term_stat──> candidates       │
│              │                   (may load a tst shard via Source)       │
│              ├──score──> tf·idf ──sort──> score desc, id desc            │
│              └──fetch_hits──> Document (may load a dcs shard) ──> Hit    │
└──────────────────────────────────────────────────────────────────────────┘
*/
